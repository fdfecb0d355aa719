//! Repository integration tests against a real Postgres database.
//!
//! Exercises:
//! - Defaults filled by the database (statuses, track number, paid date)
//! - COALESCE partial updates
//! - The transactional composite project create
//! - Budget upsert and the per-project category constraint
//! - Cascades on delete, including owned attachments
//!
//! Ignored by default; run with `DATABASE_URL` set and `--ignored`.

use labelops_core::status::{ATTACHMENT_OWNER_PAYMENT, ATTACHMENT_OWNER_PROJECT};
use labelops_db::models::artist::{CreateArtist, UpdateArtist};
use labelops_db::models::attachment::CreateAttachment;
use labelops_db::models::budget::CreateBudget;
use labelops_db::models::payment::{CreatePayment, UpdatePayment};
use labelops_db::models::project::{CreateProject, CreateProjectComposite};
use labelops_db::models::reference::ReferenceDraft;
use labelops_db::models::track::TrackDraft;
use labelops_db::repositories::{
    ArtistRepo, AttachmentRepo, BudgetRepo, PaymentRepo, ProjectRepo, ReferenceRepo, TrackRepo,
};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_artist(name: &str) -> CreateArtist {
    CreateArtist {
        name: name.to_string(),
        stage_name: None,
        genre: Some("MPB".to_string()),
        email: None,
        phone: None,
        bio: None,
        photo_url: None,
        social_links: None,
        status: None,
    }
}

fn new_project(artist_id: i64, title: &str) -> CreateProject {
    CreateProject {
        artist_id,
        producer_id: None,
        title: title.to_string(),
        kind: "album".to_string(),
        status: None,
        start_date: None,
        target_release_date: None,
        notes: None,
        tags: Some(vec!["estreia".to_string()]),
    }
}

fn new_payment(project_id: i64, budget_id: Option<i64>, status: Option<&str>) -> CreatePayment {
    CreatePayment {
        project_id,
        budget_id,
        supplier_id: None,
        producer_id: None,
        description: "Diária de estúdio".to_string(),
        amount_cents: 50_000,
        status: status.map(str::to_string),
        due_date: None,
        paid_on: None,
        method: None,
    }
}

// ---------------------------------------------------------------------------
// Artists
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_artist_defaults_and_partial_update(pool: PgPool) {
    let artist = ArtistRepo::create(&pool, &new_artist("Marina")).await.unwrap();
    assert_eq!(artist.status, "active");
    assert!(artist.social_links.is_empty());

    let update = UpdateArtist {
        stage_name: Some(Some("Marina Sol".to_string())),
        ..UpdateArtist::default()
    };
    let updated = ArtistRepo::update(&pool, artist.id, &update)
        .await
        .unwrap()
        .expect("artist exists");
    assert_eq!(updated.stage_name.as_deref(), Some("Marina Sol"));
    assert_eq!(updated.genre.as_deref(), Some("MPB"));

    assert!(ArtistRepo::update(&pool, 999_999, &update).await.unwrap().is_none());
}

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_composite_create_is_atomic(pool: PgPool) {
    let artist = ArtistRepo::create(&pool, &new_artist("Coletivo")).await.unwrap();

    let composite = CreateProjectComposite {
        project: new_project(artist.id, "Horizonte"),
        tracks: vec![
            TrackDraft {
                title: "Abertura".to_string(),
                ..TrackDraft::default()
            },
            TrackDraft {
                title: "Horizonte".to_string(),
                track_number: Some(2),
                ..TrackDraft::default()
            },
        ],
        references: vec![ReferenceDraft {
            title: "Timbre".to_string(),
            url: "https://youtu.be/dQw4w9WgXcQ".to_string(),
            ..ReferenceDraft::default()
        }],
    };
    let (project, tracks, references) = ProjectRepo::create_composite(&pool, &composite)
        .await
        .unwrap();
    assert_eq!(project.status, "planning");
    assert_eq!(project.tags, vec!["estreia"]);
    assert_eq!(tracks.len(), 2);
    assert_eq!(tracks[0].track_number, 1);
    assert_eq!(references[0].youtube_id.as_deref(), Some("dQw4w9WgXcQ"));

    // A bad track number violates a CHECK constraint and rolls back the
    // project insert too.
    let broken = CreateProjectComposite {
        project: new_project(artist.id, "Quebrado"),
        tracks: vec![TrackDraft {
            title: "Zero".to_string(),
            track_number: Some(0),
            ..TrackDraft::default()
        }],
        references: vec![],
    };
    assert!(ProjectRepo::create_composite(&pool, &broken).await.is_err());
    let titles: Vec<String> = ProjectRepo::list(&pool)
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.title)
        .collect();
    assert_eq!(titles, vec!["Horizonte"]);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_delete_artist_cascades(pool: PgPool) {
    let artist = ArtistRepo::create(&pool, &new_artist("Helena")).await.unwrap();
    let composite = CreateProjectComposite {
        project: new_project(artist.id, "Sessões"),
        tracks: vec![TrackDraft {
            title: "Uma".to_string(),
            ..TrackDraft::default()
        }],
        references: vec![],
    };
    let (project, tracks, _) = ProjectRepo::create_composite(&pool, &composite)
        .await
        .unwrap();

    assert!(ArtistRepo::delete(&pool, artist.id).await.unwrap().is_some());
    assert!(ProjectRepo::find_by_id(&pool, project.id).await.unwrap().is_none());
    assert!(TrackRepo::find_by_id(&pool, tracks[0].id).await.unwrap().is_none());
    assert!(ReferenceRepo::list(&pool).await.unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Budgets and payments
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_budget_upsert_and_unique_category(pool: PgPool) {
    let artist = ArtistRepo::create(&pool, &new_artist("JP")).await.unwrap();
    let project = ProjectRepo::create(&pool, &new_project(artist.id, "Madrugada"))
        .await
        .unwrap();

    let line = CreateBudget {
        project_id: project.id,
        category: "Gravação".to_string(),
        description: Some("Estúdio".to_string()),
        planned_cents: 100_000,
    };
    let created = BudgetRepo::create(&pool, &line).await.unwrap();

    let err = BudgetRepo::create(&pool, &line).await.unwrap_err();
    let constraint = err
        .as_database_error()
        .and_then(|e| e.constraint())
        .map(str::to_string);
    assert_eq!(constraint.as_deref(), Some("uq_budgets_project_category"));

    let upserted = BudgetRepo::upsert(
        &pool,
        &CreateBudget {
            description: None,
            planned_cents: 150_000,
            ..line
        },
    )
    .await
    .unwrap();
    assert_eq!(upserted.id, created.id);
    assert_eq!(upserted.planned_cents, 150_000);
    assert_eq!(upserted.description.as_deref(), Some("Estúdio"));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_payment_paid_on_is_stamped(pool: PgPool) {
    let artist = ArtistRepo::create(&pool, &new_artist("Bia")).await.unwrap();
    let project = ProjectRepo::create(&pool, &new_project(artist.id, "Verão"))
        .await
        .unwrap();
    let budget = BudgetRepo::create(
        &pool,
        &CreateBudget {
            project_id: project.id,
            category: "Capa".to_string(),
            description: None,
            planned_cents: 80_000,
        },
    )
    .await
    .unwrap();

    let paid = PaymentRepo::create(&pool, &new_payment(project.id, None, Some("paid")))
        .await
        .unwrap();
    assert!(paid.paid_on.is_some());

    let pending = PaymentRepo::create(&pool, &new_payment(project.id, Some(budget.id), None))
        .await
        .unwrap();
    assert_eq!(pending.status, "pending");
    assert!(pending.paid_on.is_none());

    let update = UpdatePayment {
        status: Some("paid".to_string()),
        ..UpdatePayment::default()
    };
    let settled = PaymentRepo::update(&pool, pending.id, &update)
        .await
        .unwrap()
        .expect("payment exists");
    assert!(settled.paid_on.is_some());

    // Deleting the budget line keeps the payment.
    assert!(BudgetRepo::delete(&pool, budget.id).await.unwrap().is_some());
    let orphan = PaymentRepo::find_by_id(&pool, pending.id)
        .await
        .unwrap()
        .expect("payment survives");
    assert_eq!(orphan.budget_id, None);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_delete_project_releases_owned_attachments(pool: PgPool) {
    let artist = ArtistRepo::create(&pool, &new_artist("Lia")).await.unwrap();
    let project = ProjectRepo::create(&pool, &new_project(artist.id, "Lado B"))
        .await
        .unwrap();
    let payment = PaymentRepo::create(&pool, &new_payment(project.id, None, None))
        .await
        .unwrap();

    let attach = |owner_type: &str, owner_id, key: &str| CreateAttachment {
        owner_type: owner_type.to_string(),
        owner_id,
        file_name: "recibo.pdf".to_string(),
        storage_key: key.to_string(),
        public_url: format!("/files/{key}"),
        mime_type: "application/pdf".to_string(),
        size_bytes: 10,
    };
    AttachmentRepo::create(&pool, &attach(ATTACHMENT_OWNER_PROJECT, project.id, "a/p"))
        .await
        .unwrap();
    AttachmentRepo::create(&pool, &attach(ATTACHMENT_OWNER_PAYMENT, payment.id, "a/q"))
        .await
        .unwrap();

    let mut keys = ProjectRepo::delete(&pool, project.id)
        .await
        .unwrap()
        .expect("project existed");
    keys.sort();
    assert_eq!(keys, vec!["a/p", "a/q"]);
    assert!(
        AttachmentRepo::list_by_owner(&pool, ATTACHMENT_OWNER_PAYMENT, payment.id)
            .await
            .unwrap()
            .is_empty()
    );

    assert!(ProjectRepo::delete(&pool, project.id).await.unwrap().is_none());
}
