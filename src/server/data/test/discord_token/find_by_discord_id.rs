use super::*;

/// Tests finding the tokens of a user with a stored record.
///
/// Expected: Ok(Some) with the stored token pair
#[tokio::test]
async fn finds_stored_tokens() -> Result<(), AppError> {
    let test = TestBuilder::new().with_token_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let token = DiscordTokenFactory::new(db)
        .discord_id("987654321")
        .build()
        .await?;

    let repo = DiscordTokenRepository::new(db);
    let stored = repo.find_by_discord_id(987654321).await?.unwrap();

    assert_eq!(stored.discord_id, 987654321);
    assert_eq!(stored.tokens.access_token, token.access_token);
    assert_eq!(stored.tokens.refresh_token, token.refresh_token);

    Ok(())
}

/// Tests finding the tokens of a user who never logged in.
///
/// Expected: Ok(None)
#[tokio::test]
async fn returns_none_for_unknown_user() -> Result<(), AppError> {
    let test = TestBuilder::new().with_token_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let other = create_token(db).await?;

    // Factory IDs start at 1
    let repo = DiscordTokenRepository::new(db);
    let stored = repo.find_by_discord_id(0).await?;

    assert_ne!(other.discord_id, "0");

    assert!(stored.is_none());

    Ok(())
}
