use mural_shared::messages::MessageResponse;

#[mural_macros::test(strategy = "Seeded")]
async fn get_messages_returns_200_for_valid_request() {
    // Act
    let response = app.get_messages().await;

    // Assert
    assert_eq!(200, response.status().as_u16());
}

#[mural_macros::test(strategy = "Seeded")]
async fn get_messages_returns_all_messages_newest_first() {
    // Act
    let response = app
        .get_messages()
        .await
        .json::<Vec<MessageResponse>>()
        .await
        .unwrap();

    // Assert
    assert_eq!(app.seeded_messages().len(), response.len());

    for window in response.windows(2) {
        assert!(window[0].created_at >= window[1].created_at);
    }

    let seeded_newest_first: Vec<_> = app.seeded_messages().iter().rev().collect();

    for (seeded, returned) in seeded_newest_first.iter().zip(response.iter()) {
        assert_eq!(seeded.id, returned.id);
        assert_eq!(seeded.author, returned.author);
        assert_eq!(seeded.body, returned.body);
    }
}

#[mural_macros::test]
async fn get_messages_returns_an_empty_list_without_stored_messages() {
    // Act
    let response = app
        .get_messages()
        .await
        .json::<Vec<MessageResponse>>()
        .await
        .unwrap();

    // Assert
    assert!(response.is_empty());
}

#[mural_macros::test(strategy = "Seeded")]
async fn get_messages_fails_if_there_is_a_database_error() {
    // Arrange
    sqlx::query("ALTER TABLE messages DROP COLUMN body;")
        .execute(&app.db_pool)
        .await
        .unwrap();

    // Act
    let response = app.get_messages().await;

    // Assert
    assert_eq!(500, response.status().as_u16());

    let body = response.json::<serde_json::Value>().await.unwrap();

    assert!(body.get("error").is_some());
}
