use super::*;

/// Tests storing tokens for a user with no existing record.
///
/// Expected: Ok with the token pair stored under the user's Discord ID
#[tokio::test]
async fn creates_new_token_record() -> Result<(), AppError> {
    let test = TestBuilder::new().with_token_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let expires_at = Utc::now() + Duration::days(7);
    let repo = DiscordTokenRepository::new(db);
    let stored = repo
        .upsert(UpsertTokenParam {
            discord_id: 123456789,
            tokens: TokenPair {
                access_token: "access".to_string(),
                refresh_token: "refresh".to_string(),
                expires_at,
            },
        })
        .await?;

    assert_eq!(stored.discord_id, 123456789);
    assert_eq!(stored.tokens.access_token, "access");
    assert_eq!(stored.tokens.refresh_token, "refresh");
    assert_eq!((stored.tokens.expires_at - expires_at).num_seconds(), 0);

    Ok(())
}

/// Tests storing tokens for a user who already has a record.
///
/// Verifies that the new pair replaces the old one rather than failing on the
/// primary key or creating a second row.
///
/// Expected: Ok with the record holding only the new token pair
#[tokio::test]
async fn replaces_existing_token_record() -> Result<(), AppError> {
    let test = TestBuilder::new().with_token_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    DiscordTokenFactory::new(db)
        .discord_id("123456789")
        .access_token("old-access")
        .refresh_token("old-refresh")
        .expired()
        .build()
        .await?;

    let repo = DiscordTokenRepository::new(db);
    repo.upsert(UpsertTokenParam {
        discord_id: 123456789,
        tokens: TokenPair {
            access_token: "new-access".to_string(),
            refresh_token: "new-refresh".to_string(),
            expires_at: Utc::now() + Duration::days(7),
        },
    })
    .await?;

    let stored = repo.find_by_discord_id(123456789).await?.unwrap();
    assert_eq!(stored.tokens.access_token, "new-access");
    assert_eq!(stored.tokens.refresh_token, "new-refresh");
    assert!(!stored.is_expired());

    Ok(())
}
