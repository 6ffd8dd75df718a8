mod discord_token;
