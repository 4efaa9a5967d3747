mod common;

use bookdrop::services::library::NewFile;
use common::test_state;

fn draft(title: &str, special: bool) -> NewFile {
    NewFile {
        file_handle: format!("handle-{title}"),
        title: title.to_string(),
        tags: "".to_string(),
        special,
        uploader: 42,
    }
}

#[tokio::test]
async fn test_insert_assigns_monotonic_ids() {
    let (state, _) = test_state(0).await;

    let a = state.library.insert_file(&draft("a", false)).await.unwrap();
    let b = state.library.insert_file(&draft("b", false)).await.unwrap();
    assert!(b > a);

    let row = state.library.file_by_id(a).await.unwrap().unwrap();
    assert_eq!(row.title, "a");
    assert!(!row.approved);
    assert!(!row.created_at.is_empty());
}

#[tokio::test]
async fn test_approved_files_filter_and_order() {
    let (state, _) = test_state(0).await;

    let a = state.library.insert_file(&draft("a", false)).await.unwrap();
    let b = state.library.insert_file(&draft("b", false)).await.unwrap();
    let s = state.library.insert_file(&draft("s", true)).await.unwrap();
    for id in [a, b, s] {
        assert!(state.library.approve_file(id).await);
    }

    let plain = state.library.approved_files(false).await.unwrap();
    assert_eq!(plain.iter().map(|f| f.id).collect::<Vec<_>>(), vec![b, a]);

    let special = state.library.approved_files(true).await.unwrap();
    assert_eq!(special.iter().map(|f| f.id).collect::<Vec<_>>(), vec![s]);

    // all_approved spans both tiers, newest first.
    let all = state.library.all_approved().await.unwrap();
    assert_eq!(all.iter().map(|f| f.id).collect::<Vec<_>>(), vec![s, b, a]);
}

#[tokio::test]
async fn test_delete_file_removes_row() {
    let (state, _) = test_state(0).await;

    let id = state.library.insert_file(&draft("gone", false)).await.unwrap();
    assert!(state.library.delete_file(id).await);
    assert!(state.library.file_by_id(id).await.unwrap().is_none());

    // Deleting a missing row is not a storage failure.
    assert!(state.library.delete_file(id).await);
}

#[tokio::test]
async fn test_user_registration_and_grant() {
    let (state, _) = test_state(0).await;

    assert!(state.library.user(42).await.unwrap().is_none());
    assert!(!state.library.allowed_special(42).await.unwrap());

    assert!(state.library.ensure_user(42).await);
    assert!(state.library.ensure_user(42).await);
    let user = state.library.user(42).await.unwrap().unwrap();
    assert!(!user.allowed_special);

    assert!(state.library.grant_special(42).await);
    assert!(state.library.allowed_special(42).await.unwrap());

    // Re-registration never resets the grant.
    assert!(state.library.ensure_user(42).await);
    assert!(state.library.allowed_special(42).await.unwrap());
}

#[tokio::test]
async fn test_grant_special_without_prior_registration() {
    let (state, _) = test_state(0).await;

    assert!(state.library.grant_special(7).await);
    assert!(state.library.allowed_special(7).await.unwrap());
}
