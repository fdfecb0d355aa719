pub mod artist;
pub mod attachment;
pub mod budget;
pub mod dashboard;
pub mod document;
pub mod payment;
pub mod producer;
pub mod project;
pub mod reference;
pub mod release;
pub mod supplier;
pub mod track;
pub mod upload;
