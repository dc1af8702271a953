use hearth_shopping::{AddItemInput, Query};
use temp_dir::TempDir;

mod helpers;

use helpers::{HOUSEHOLD, pending_item};

#[tokio::test]
async fn test_default_list_is_created_once() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let cmd = helpers::command(&state);

    let lookups = (0..4).map(|_| {
        let cmd = cmd.clone();
        async move { cmd.default_list(HOUSEHOLD).await }
    });

    let mut ids = vec![];
    for list in futures::future::join_all(lookups).await {
        ids.push(list?.id);
    }
    ids.dedup();
    assert_eq!(ids.len(), 1);

    let list = cmd.default_list(HOUSEHOLD).await?;
    assert_eq!(list.id, ids[0]);
    assert_eq!(list.title, "Groceries");
    assert_eq!((list.total_items, list.completed_items), (0, 0));

    let other = cmd.default_list("household-2").await?;
    assert_ne!(other.id, list.id);

    Ok(())
}

#[tokio::test]
async fn test_add_item_is_manual_and_counted() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let cmd = helpers::command(&state);
    let query = Query(state.read_db.clone());
    let list = cmd.default_list(HOUSEHOLD).await?;

    let item = cmd
        .add_item(
            &list.id,
            AddItemInput {
                name: "  Dish soap ".to_owned(),
                quantity: Some("2 bottles".to_owned()),
            },
            "user-1",
        )
        .await?;

    assert_eq!(item.name, "Dish soap");
    assert!(!item.auto_added);
    assert!(!item.pending_confirmation);
    assert_eq!(item.source_recipe_id, None);

    let list = query.find_list(&list.id).await?.unwrap();
    assert_eq!(list.total_items, 1);

    cmd.set_item_complete(&item.id, true).await?;
    let list = query.find_list(&list.id).await?.unwrap();
    assert_eq!((list.total_items, list.completed_items), (1, 1));

    Ok(())
}

#[tokio::test]
async fn test_add_item_rejects_bad_input() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let cmd = helpers::command(&state);
    let list = cmd.default_list(HOUSEHOLD).await?;

    let empty = cmd
        .add_item(
            &list.id,
            AddItemInput {
                name: "".to_owned(),
                quantity: None,
            },
            "user-1",
        )
        .await;
    assert!(matches!(empty, Err(hearth_shared::Error::Validate(_))));

    let blank = cmd
        .add_item(
            &list.id,
            AddItemInput {
                name: "   ".to_owned(),
                quantity: None,
            },
            "user-1",
        )
        .await;
    assert!(matches!(blank, Err(hearth_shared::Error::User(_))));

    let missing = cmd
        .add_item(
            "01JMISSINGLIST000000000000",
            AddItemInput {
                name: "Salt".to_owned(),
                quantity: None,
            },
            "user-1",
        )
        .await;
    assert!(matches!(missing, Err(hearth_shared::Error::NotFound(_))));

    let numeric = helpers::numeric_command(&state);
    let result = numeric
        .add_item(
            &list.id,
            AddItemInput {
                name: "Flour".to_owned(),
                quantity: Some("2 cups".to_owned()),
            },
            "user-1",
        )
        .await;
    assert!(matches!(result, Err(hearth_shared::Error::User(_))));

    Ok(())
}

#[tokio::test]
async fn test_pending_items_most_recent_first() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let cmd = helpers::command(&state);
    let query = Query(state.read_db.clone());
    let list = cmd.default_list(HOUSEHOLD).await?;

    helpers::seed_items(
        &state,
        [
            pending_item(&list.id, "item-1", "Leeks", "1", 10),
            pending_item(&list.id, "item-2", "Dill", "1", 30),
            helpers::manual_item(&list.id, "item-3", "Salt", "1", 40),
            pending_item(&list.id, "item-4", "Chives", "1", 20),
        ],
    )
    .await?;

    let pending: Vec<String> = query
        .pending_items(&list.id)
        .await?
        .into_iter()
        .map(|i| i.id)
        .collect();

    assert_eq!(pending, vec!["item-2", "item-4", "item-1"]);

    Ok(())
}
