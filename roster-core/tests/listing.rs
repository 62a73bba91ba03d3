mod support;

use roster_core::{
    RosterError,
    database::RecordStore,
    query::{SortDirection, SortKey},
    user::UserRecord,
};
use support::{APP, Seed, ids, seeded_listing};

fn three_users() -> Vec<Seed> {
    vec![
        Seed::new("u1", 100).email("c@x").updated_at(900).score(40),
        Seed::new("u2", 300).email("a@x").updated_at(700).score(90),
        Seed::new("u3", 200).email("b@x").updated_at(800).score(10),
    ]
}

#[tokio::test]
async fn created_at_ascending() {
    let (_, listing) = seeded_listing(&three_users()).await;

    let users = listing
        .list(APP, SortKey::CreatedAt, SortDirection::Asc)
        .await
        .unwrap();

    let created: Vec<_> = users.iter().filter_map(|u| u.created_at()).collect();
    assert_eq!(created, vec![100, 200, 300]);
}

#[tokio::test]
async fn email_descending_is_lexicographic() {
    let (_, listing) = seeded_listing(&three_users()).await;

    let users = listing
        .list(APP, SortKey::Email, SortDirection::Desc)
        .await
        .unwrap();

    let emails: Vec<_> = users.iter().filter_map(|u| u.email()).collect();
    assert_eq!(emails, vec!["c@x", "b@x", "a@x"]);
}

#[tokio::test]
async fn updated_at_and_score_orders() {
    let (_, listing) = seeded_listing(&three_users()).await;

    let by_updated = listing
        .list(APP, SortKey::UpdatedAt, SortDirection::Asc)
        .await
        .unwrap();
    assert_eq!(ids(&by_updated), vec!["u2", "u3", "u1"]);

    let by_score = listing
        .list(APP, SortKey::Score, SortDirection::Desc)
        .await
        .unwrap();
    assert_eq!(ids(&by_score), vec!["u2", "u1", "u3"]);
    assert_eq!(by_score[0].score, Some(90));
}

#[tokio::test]
async fn membership_order_reverses_exactly() {
    let (_, listing) = seeded_listing(&three_users()).await;

    let asc = listing
        .list(APP, SortKey::None, SortDirection::Asc)
        .await
        .unwrap();
    let desc = listing
        .list(APP, SortKey::None, SortDirection::Desc)
        .await
        .unwrap();

    assert_eq!(ids(&asc), vec!["u1", "u3", "u2"]);
    let mut reversed = ids(&desc);
    reversed.reverse();
    assert_eq!(ids(&asc), reversed);
}

#[tokio::test]
async fn empty_collection_lists_nothing() {
    let (_, listing) = seeded_listing(&[]).await;

    for key in SortKey::ALL {
        for direction in [SortDirection::Asc, SortDirection::Desc] {
            let users = listing.list(APP, key, direction).await.unwrap();
            assert!(users.is_empty(), "{key} {direction}");
        }
    }
}

#[tokio::test]
async fn member_without_score_sorts_first_ascending() {
    let mut seeds = three_users();
    seeds.push(Seed::new("u4", 400).email("d@x"));
    let (_, listing) = seeded_listing(&seeds).await;

    let users = listing
        .list(APP, SortKey::Score, SortDirection::Asc)
        .await
        .unwrap();

    assert_eq!(ids(&users), vec!["u4", "u3", "u1", "u2"]);
    assert_eq!(users[0].score, None);
}

#[tokio::test]
async fn members_missing_fields_are_never_dropped() {
    let seeds = vec![
        Seed::new("u1", 100).email("b@x"),
        // Joined but never got an email or a main record timestamp.
        Seed {
            created_at: None,
            ..Seed::new("u2", 200)
        },
        Seed::new("u3", 300).email("a@x"),
    ];
    let (_, listing) = seeded_listing(&seeds).await;

    for key in SortKey::ALL {
        for direction in [SortDirection::Asc, SortDirection::Desc] {
            let users = listing.list(APP, key, direction).await.unwrap();
            assert_eq!(users.len(), 3, "{key} {direction}");
        }
    }

    let by_email = listing
        .list(APP, SortKey::Email, SortDirection::Asc)
        .await
        .unwrap();
    assert_eq!(ids(&by_email), vec!["u2", "u3", "u1"]);
    assert_eq!(by_email[0].record, UserRecord::default());
}

#[tokio::test]
async fn raw_query_validates_before_touching_the_store() {
    let (store, listing) = seeded_listing(&three_users()).await;
    let before = store.command_count();

    let err = listing.list_raw(APP, "rank", "asc").await.unwrap_err();
    assert_eq!(err, RosterError::InvalidDescriptor("rank".into()));

    let err = listing.list_raw(APP, "email", "up").await.unwrap_err();
    assert_eq!(err, RosterError::InvalidDirection("up".into()));

    assert_eq!(store.command_count(), before);
}

#[tokio::test]
async fn raw_query_accepts_empty_descriptor() {
    let (_, listing) = seeded_listing(&three_users()).await;

    let users = listing.list_raw(APP, "", "desc").await.unwrap();
    assert_eq!(ids(&users), vec!["u2", "u3", "u1"]);
}

#[tokio::test]
async fn unavailable_store_fails_the_whole_listing() {
    let (store, listing) = seeded_listing(&three_users()).await;
    store.set_unavailable(true);

    for key in SortKey::ALL {
        let err = listing
            .list(APP, key, SortDirection::Asc)
            .await
            .unwrap_err();
        assert!(matches!(err, RosterError::StoreUnavailable(_)), "{key}");
    }
}

#[tokio::test]
async fn rescoring_a_member_changes_membership_order() {
    let (_, listing) = seeded_listing(&three_users()).await;

    listing.repository().add_member(APP, "u2", 50).await.unwrap();

    let users = listing
        .list(APP, SortKey::None, SortDirection::Asc)
        .await
        .unwrap();
    assert_eq!(ids(&users), vec!["u2", "u1", "u3"]);
}

#[tokio::test]
async fn empty_app_id_fails_for_every_key_without_store_calls() {
    let (store, listing) = seeded_listing(&three_users()).await;
    let before = store.command_count();

    for key in SortKey::ALL {
        let err = listing
            .list("", key, SortDirection::Asc)
            .await
            .unwrap_err();
        assert_eq!(err, RosterError::InvalidIdentifier, "{key}");
    }
    assert_eq!(store.command_count(), before);
}

#[tokio::test]
async fn fractional_timestamp_sorts_numerically_and_is_shown() {
    let (store, listing) = seeded_listing(&three_users()).await;
    store
        .hset("test:user:u3", "created_at", "350.5")
        .await
        .unwrap();

    let users = listing
        .list(APP, SortKey::CreatedAt, SortDirection::Desc)
        .await
        .unwrap();

    assert_eq!(ids(&users), vec!["u3", "u2", "u1"]);
    assert_eq!(users[0].created_at(), None);
    assert!(users[0].to_string().contains("created_at: 350.5\t"));
}
