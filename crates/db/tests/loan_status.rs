//! Integration tests for copies and their loan state.
//!
//! Covers the status default, unrestricted status changes, rejection of
//! unknown status codes, overdue and per-borrower listings, and what
//! happens to copies when their borrower is deleted.

use assert_matches::assert_matches;
use catalog_core::error::CoreError;
use catalog_core::listing::cmp_copies;
use catalog_core::loan::LoanStatus;
use catalog_core::types::{CopyId, Date, DbId};
use catalog_db::models::book::CreateBook;
use catalog_db::models::book_instance::{BookInstance, CreateBookInstance, UpdateBookInstance};
use catalog_db::models::user::CreateUser;
use catalog_db::repositories::{BookInstanceRepo, BookRepo, CatalogRepo, UserRepo};
use catalog_db::DbError;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn date(y: i32, m: u32, d: u32) -> Date {
    Date::from_ymd_opt(y, m, d).unwrap()
}

async fn seed_book(pool: &PgPool, title: &str) -> DbId {
    BookRepo::create(
        pool,
        &CreateBook {
            title: title.to_string(),
            author_id: None,
            summary: "Summary.".to_string(),
            isbn: "0000000000".to_string(),
            genre_ids: vec![],
        },
    )
    .await
    .unwrap()
    .id
}

async fn seed_user(pool: &PgPool, username: &str) -> DbId {
    UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            email: None,
        },
    )
    .await
    .unwrap()
    .id
}

async fn seed_copy(
    pool: &PgPool,
    book_id: Option<DbId>,
    due_back: Option<Date>,
    borrower_id: Option<DbId>,
    status: Option<LoanStatus>,
) -> BookInstance {
    BookInstanceRepo::create(
        pool,
        &CreateBookInstance {
            book_id,
            imprint: "Penguin, 1999".to_string(),
            due_back,
            borrower_id,
            status,
        },
    )
    .await
    .unwrap()
}

fn ids(instances: &[BookInstance]) -> Vec<CopyId> {
    instances.iter().map(|i| i.id).collect()
}

// ---------------------------------------------------------------------------
// Test: Status
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_status_defaults_to_maintenance(pool: PgPool) {
    let copy = seed_copy(&pool, None, None, None, None).await;
    assert_eq!(copy.status, LoanStatus::Maintenance);

    let (raw,): (String,) = sqlx::query_as("SELECT status FROM book_instances WHERE id = $1")
        .bind(copy.id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(raw, "m");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_any_status_transition_allowed(pool: PgPool) {
    let copy = seed_copy(&pool, None, None, None, Some(LoanStatus::Available)).await;

    let path = [
        LoanStatus::OnLoan,
        LoanStatus::Reserved,
        LoanStatus::Maintenance,
        LoanStatus::Available,
        LoanStatus::Reserved,
    ];
    for status in path {
        let updated = BookInstanceRepo::set_status(&pool, copy.id, status)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.status, status);
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_imprint_and_status(pool: PgPool) {
    let copy = seed_copy(&pool, None, None, None, None).await;

    let updated = BookInstanceRepo::update(
        &pool,
        copy.id,
        &UpdateBookInstance {
            imprint: None,
            status: Some(LoanStatus::OnLoan),
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(updated.status, LoanStatus::OnLoan);
    assert_eq!(updated.imprint, copy.imprint);

    let err = BookInstanceRepo::update(
        &pool,
        copy.id,
        &UpdateBookInstance {
            imprint: Some(String::new()),
            status: None,
        },
    )
    .await
    .unwrap_err();
    assert_matches!(err, DbError::Core(CoreError::Validation(_)));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unknown_status_code_rejected_by_schema(pool: PgPool) {
    let copy = seed_copy(&pool, None, None, None, None).await;

    let err = sqlx::query("UPDATE book_instances SET status = 'x' WHERE id = $1")
        .bind(copy.id)
        .execute(&pool)
        .await
        .map_err(DbError::from)
        .unwrap_err();
    assert!(err.is_validation());

    let unchanged = BookInstanceRepo::find_by_id(&pool, copy.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(unchanged.status, LoanStatus::Maintenance);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_by_status(pool: PgPool) {
    let a = seed_copy(&pool, None, None, None, Some(LoanStatus::Available)).await;
    seed_copy(&pool, None, None, None, Some(LoanStatus::OnLoan)).await;
    let b = seed_copy(&pool, None, None, None, Some(LoanStatus::Available)).await;

    let available = BookInstanceRepo::list_by_status(&pool, LoanStatus::Available)
        .await
        .unwrap();
    let mut expected = vec![a.id, b.id];
    expected.sort();
    assert_eq!(ids(&available), expected);

    let reserved = BookInstanceRepo::list_by_status(&pool, LoanStatus::Reserved)
        .await
        .unwrap();
    assert!(reserved.is_empty());
}

// ---------------------------------------------------------------------------
// Test: Due dates and ordering
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_copies_listed_undated_first_then_by_due_date(pool: PgPool) {
    let late = seed_copy(&pool, None, Some(date(2024, 3, 1)), None, None).await;
    let undated = seed_copy(&pool, None, None, None, None).await;
    let early = seed_copy(&pool, None, Some(date(2024, 1, 1)), None, None).await;

    let listed = BookInstanceRepo::list(&pool).await.unwrap();
    assert_eq!(ids(&listed), vec![undated.id, early.id, late.id]);

    for pair in listed.windows(2) {
        assert_ne!(cmp_copies(&pair[0], &pair[1]), std::cmp::Ordering::Greater);
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_for_book_and_with_titles(pool: PgPool) {
    let dune = seed_book(&pool, "Dune").await;
    let emma = seed_book(&pool, "Emma").await;
    let first = seed_copy(&pool, Some(dune), Some(date(2024, 2, 1)), None, None).await;
    let second = seed_copy(&pool, Some(dune), None, None, None).await;
    seed_copy(&pool, Some(emma), None, None, None).await;

    let for_dune = BookInstanceRepo::list_for_book(&pool, dune).await.unwrap();
    assert_eq!(ids(&for_dune), vec![second.id, first.id]);

    let titled = BookInstanceRepo::list_with_titles(&pool).await.unwrap();
    assert_eq!(titled.len(), 3);
    let first_titled = titled.iter().find(|t| t.instance.id == first.id).unwrap();
    assert_eq!(first_titled.book_title.as_deref(), Some("Dune"));
    assert_eq!(first_titled.to_string(), format!("{} (Dune)", first.id));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_overdue_flag_and_listing(pool: PgPool) {
    let today = date(2024, 6, 15);
    let past = seed_copy(&pool, None, Some(date(2024, 6, 14)), None, None).await;
    let due_today = seed_copy(&pool, None, Some(today), None, None).await;
    let future = seed_copy(&pool, None, Some(date(2024, 6, 16)), None, None).await;
    let undated = seed_copy(&pool, None, None, None, None).await;

    assert!(past.is_overdue_on(today));
    assert!(!due_today.is_overdue_on(today));
    assert!(!future.is_overdue_on(today));
    assert!(!undated.is_overdue_on(today));

    let overdue = BookInstanceRepo::list_overdue(&pool, today).await.unwrap();
    assert_eq!(ids(&overdue), vec![past.id]);

    // The listing and the per-copy flag agree.
    let all = BookInstanceRepo::list(&pool).await.unwrap();
    let flagged: Vec<CopyId> = all
        .iter()
        .filter(|c| c.is_overdue_on(today))
        .map(|c| c.id)
        .collect();
    assert_eq!(flagged, ids(&overdue));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_set_and_clear_due_back(pool: PgPool) {
    let copy = seed_copy(&pool, None, None, None, None).await;

    let dated = BookInstanceRepo::set_due_back(&pool, copy.id, Some(date(2000, 1, 1)))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(dated.due_back, Some(date(2000, 1, 1)));
    assert!(dated.is_overdue());

    let cleared = BookInstanceRepo::set_due_back(&pool, copy.id, None)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(cleared.due_back, None);
    assert!(!cleared.is_overdue());
}

// ---------------------------------------------------------------------------
// Test: Borrowers
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_on_loan_to_borrower(pool: PgPool) {
    let dune = seed_book(&pool, "Dune").await;
    let alice = seed_user(&pool, "alice").await;
    let bob = seed_user(&pool, "bob").await;

    let later = seed_copy(
        &pool,
        Some(dune),
        Some(date(2024, 9, 1)),
        Some(alice),
        Some(LoanStatus::OnLoan),
    )
    .await;
    let sooner = seed_copy(
        &pool,
        Some(dune),
        Some(date(2024, 8, 1)),
        Some(alice),
        Some(LoanStatus::OnLoan),
    )
    .await;
    // Borrower set but not on loan: excluded.
    seed_copy(&pool, Some(dune), None, Some(alice), Some(LoanStatus::Reserved)).await;
    seed_copy(&pool, Some(dune), None, Some(bob), Some(LoanStatus::OnLoan)).await;

    let loans = BookInstanceRepo::list_on_loan_to(&pool, alice).await.unwrap();
    let loan_ids: Vec<CopyId> = loans.iter().map(|l| l.instance.id).collect();
    assert_eq!(loan_ids, vec![sooner.id, later.id]);
    assert!(loans.iter().all(|l| l.book_title.as_deref() == Some("Dune")));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_borrower_resolution_and_reassignment(pool: PgPool) {
    let alice = seed_user(&pool, "alice").await;
    let copy = seed_copy(&pool, None, None, None, None).await;
    assert!(BookInstanceRepo::borrower(&pool, &copy).await.unwrap().is_none());

    let lent = BookInstanceRepo::set_borrower(&pool, copy.id, Some(alice))
        .await
        .unwrap()
        .unwrap();
    let borrower = BookInstanceRepo::borrower(&pool, &lent).await.unwrap().unwrap();
    assert_eq!(borrower.username, "alice");
    assert_eq!(borrower.to_string(), "alice");

    let err = BookInstanceRepo::set_borrower(&pool, copy.id, Some(alice + 1000))
        .await
        .unwrap_err();
    assert!(err.is_validation());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_borrower_nullifies_copies(pool: PgPool) {
    let alice = seed_user(&pool, "alice").await;
    let copy = seed_copy(&pool, None, None, Some(alice), Some(LoanStatus::OnLoan)).await;

    assert!(UserRepo::delete(&pool, alice).await.unwrap());

    let after = BookInstanceRepo::find_by_id(&pool, copy.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(after.borrower_id, None);
    assert_eq!(after.status, LoanStatus::OnLoan);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_username_is_conflict(pool: PgPool) {
    seed_user(&pool, "alice").await;
    let err = UserRepo::create(
        &pool,
        &CreateUser {
            username: "alice".to_string(),
            email: None,
        },
    )
    .await
    .unwrap_err();
    assert_matches!(err, DbError::Core(CoreError::Conflict(_)));

    let found = UserRepo::find_by_username(&pool, "alice").await.unwrap();
    assert!(found.is_some());
}

// ---------------------------------------------------------------------------
// Test: Reassignment and deletion
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_move_copy_between_books(pool: PgPool) {
    let dune = seed_book(&pool, "Dune").await;
    let emma = seed_book(&pool, "Emma").await;
    let copy = seed_copy(&pool, Some(dune), None, None, None).await;

    let moved = BookInstanceRepo::set_book(&pool, copy.id, Some(emma))
        .await
        .unwrap()
        .unwrap();
    let book = BookInstanceRepo::book(&pool, &moved).await.unwrap().unwrap();
    assert_eq!(book.title, "Emma");
    assert_eq!(moved.label_with(Some(&book)), format!("{} (Emma)", copy.id));

    assert!(BookInstanceRepo::delete(&pool, copy.id).await.unwrap());
    assert!(BookInstanceRepo::find_by_id(&pool, copy.id).await.unwrap().is_none());
    assert!(BookRepo::find_by_id(&pool, emma).await.unwrap().is_some());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_counts_track_available_copies(pool: PgPool) {
    let dune = seed_book(&pool, "Dune").await;
    seed_copy(&pool, Some(dune), None, None, Some(LoanStatus::Available)).await;
    seed_copy(&pool, Some(dune), None, None, Some(LoanStatus::Available)).await;
    let lent = seed_copy(&pool, Some(dune), None, None, Some(LoanStatus::OnLoan)).await;

    let counts = CatalogRepo::counts(&pool).await.unwrap();
    assert_eq!(counts.num_books, 1);
    assert_eq!(counts.num_instances, 3);
    assert_eq!(counts.num_instances_available, 2);

    BookInstanceRepo::set_status(&pool, lent.id, LoanStatus::Available)
        .await
        .unwrap();
    let counts = CatalogRepo::counts(&pool).await.unwrap();
    assert_eq!(counts.num_instances_available, 3);
}
