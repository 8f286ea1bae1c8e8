//! Integration tests for the Buttondown API client

mod test_utils;

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use buttondown::buttondown::{
        ApiKey, ButtondownClient, CreateEmailRequest, EmailStatus, Error, Interval,
        UpdateEmailRequest,
    };
    use mockito::Matcher;
    use serde_json::json;

    use crate::test_utils::{fixture, test_client};

    #[tokio::test]
    async fn it_lists_emails_with_auth_headers() -> Result<()> {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/emails")
            .match_header("authorization", "Token test-key")
            .match_header("content-type", "application/json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(fixture("emails.json"))
            .create_async()
            .await;

        let page = test_client(&server).list_emails(None).await?;

        assert_eq!(page.count, 7);
        assert!(page.has_next());
        assert_eq!(page.previous, None);
        let email = &page.results[0];
        assert_eq!(email.subject, "Welcome to the Focus");
        assert_eq!(email.status, EmailStatus::Sent);
        assert_eq!(email.analytics.as_ref().map(|a| a.opens), Some(75));
        assert_eq!(email.filters.predicate, "and");
        mock.assert_async().await;

        Ok(())
    }

    #[tokio::test]
    async fn it_filters_emails_by_status() -> Result<()> {
        let mut server = mockito::Server::new_async().await;
        let drafts = server
            .mock("GET", "/emails?status=draft")
            .with_status(200)
            .with_body(r#"{"count": 0, "next": null, "previous": null, "results": []}"#)
            .create_async()
            .await;
        let scheduled = server
            .mock("GET", "/emails?status=scheduled")
            .with_status(200)
            .with_body(r#"{"count": 0, "next": null, "previous": null, "results": []}"#)
            .create_async()
            .await;

        let client = test_client(&server);
        assert_eq!(client.list_drafts().await?.count, 0);
        assert!(client.list_scheduled_emails().await?.results.is_empty());
        drafts.assert_async().await;
        scheduled.assert_async().await;

        Ok(())
    }

    #[tokio::test]
    async fn it_gets_an_email() -> Result<()> {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/emails/abc")
            .with_status(200)
            .with_body(fixture("email_draft.json"))
            .create_async()
            .await;

        let email = test_client(&server).get_email("abc").await?;
        assert_eq!(email.id, "abc");
        assert_eq!(email.publish_date, None);
        assert_eq!(email.analytics, None);

        Ok(())
    }

    #[tokio::test]
    async fn it_creates_a_draft() -> Result<()> {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/emails")
            .match_body(Matcher::Json(json!({
                "subject": "Hi",
                "body": "hello",
                "status": "draft",
                "email_type": "public"
            })))
            .with_status(201)
            .with_body(fixture("email_draft.json"))
            .create_async()
            .await;

        let email = test_client(&server).create_draft("hello", Some("Hi")).await?;

        assert_eq!(email.id, "abc");
        assert_eq!(email.status, EmailStatus::Draft);
        mock.assert_async().await;

        Ok(())
    }

    #[tokio::test]
    async fn it_normalizes_line_endings_before_sending() -> Result<()> {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/emails")
            .match_body(Matcher::PartialJson(json!({
                "body": "# Title\n\nline one\nline two\n",
                "status": "draft"
            })))
            .with_status(201)
            .with_body(fixture("email_draft.json"))
            .create_async()
            .await;

        let req = CreateEmailRequest::draft("Hi", "# Title\r\n\r\nline one\r\nline two\r\n");
        test_client(&server).create_email(&req).await?;
        mock.assert_async().await;

        Ok(())
    }

    #[tokio::test]
    async fn it_defaults_the_draft_subject() -> Result<()> {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/emails")
            .match_body(Matcher::PartialJson(json!({"subject": "Untitled Draft"})))
            .with_status(201)
            .with_body(fixture("email_draft.json"))
            .create_async()
            .await;

        test_client(&server).create_draft("hello", None).await?;
        mock.assert_async().await;

        Ok(())
    }

    #[tokio::test]
    async fn it_rejects_an_empty_body_without_calling_the_api() {
        let mut server = mockito::Server::new_async().await;
        let mock = server.mock("POST", "/emails").expect(0).create_async().await;

        let res = test_client(&server)
            .create_email(&CreateEmailRequest::draft("Hi", "  \r\n"))
            .await;

        assert!(matches!(res, Err(Error::InvalidRequest(_))));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn it_sends_only_the_updated_fields() -> Result<()> {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PATCH", "/emails/abc")
            .match_body(Matcher::Json(json!({"subject": "New subject"})))
            .with_status(200)
            .with_body(r#"{"id": "abc", "subject": "New subject", "status": "draft"}"#)
            .create_async()
            .await;

        let update = UpdateEmailRequest {
            subject: Some(String::from("New subject")),
            ..Default::default()
        };
        let email = test_client(&server).update_email("abc", &update).await?;

        assert_eq!(email.subject, "New subject");
        mock.assert_async().await;

        Ok(())
    }

    #[tokio::test]
    async fn it_schedules_an_email_at_the_exact_time() -> Result<()> {
        let scheduled_for = "2024-12-01T10:00:00-05:00";
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PATCH", "/emails/abc")
            .match_body(Matcher::Json(json!({
                "status": "scheduled",
                "scheduled_for": scheduled_for
            })))
            .with_status(200)
            .with_body(
                json!({"id": "abc", "status": "scheduled", "scheduled_for": scheduled_for})
                    .to_string(),
            )
            .create_async()
            .await;

        let email = test_client(&server)
            .schedule_email("abc", scheduled_for)
            .await?;

        assert_eq!(email.status, EmailStatus::Scheduled);
        assert_eq!(email.scheduled_for.as_deref(), Some(scheduled_for));
        mock.assert_async().await;

        Ok(())
    }

    #[tokio::test]
    async fn it_unschedules_with_an_explicit_null() -> Result<()> {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PATCH", "/emails/abc")
            .match_body(Matcher::Json(json!({
                "status": "draft",
                "scheduled_for": null
            })))
            .with_status(200)
            .with_body(r#"{"id": "abc", "status": "draft", "scheduled_for": null}"#)
            .create_async()
            .await;

        let email = test_client(&server).unschedule_email("abc").await?;

        assert_eq!(email.status, EmailStatus::Draft);
        assert_eq!(email.scheduled_for, None);
        mock.assert_async().await;

        Ok(())
    }

    #[tokio::test]
    async fn it_deletes_an_email() -> Result<()> {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("DELETE", "/emails/abc")
            .with_status(204)
            .create_async()
            .await;

        test_client(&server).delete_email("abc").await?;
        mock.assert_async().await;

        Ok(())
    }

    #[tokio::test]
    async fn it_lists_subscribers_and_tags() -> Result<()> {
        let mut server = mockito::Server::new_async().await;
        let _subscribers = server
            .mock("GET", "/subscribers")
            .with_status(200)
            .with_body(fixture("subscribers.json"))
            .create_async()
            .await;
        let _tags = server
            .mock("GET", "/tags")
            .with_status(200)
            .with_body(fixture("tags.json"))
            .create_async()
            .await;

        let client = test_client(&server);
        let subscribers = client.list_subscribers().await?;
        assert_eq!(subscribers.count, 2);
        assert_eq!(subscribers.results[0].email, "user@example.com");
        assert_eq!(subscribers.results[1].metadata["referrer"], "twitter");

        let tags = client.list_tags().await?;
        assert_eq!(tags.results[0].name, "rust");
        assert_eq!(tags.results[0].subscriber_count, 12);

        Ok(())
    }

    #[tokio::test]
    async fn it_gets_analytics_from_the_dedicated_endpoint() -> Result<()> {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/emails/abc/analytics")
            .with_status(200)
            .with_body(r#"{"recipients": 100, "opens": 75, "page_views__7": 10}"#)
            .create_async()
            .await;

        let analytics = test_client(&server).get_analytics("abc").await?;
        assert_eq!(analytics.recipients, 100);
        assert_eq!(analytics.opens, 75);
        assert_eq!(analytics.page_views_7, 10);

        Ok(())
    }

    #[tokio::test]
    async fn it_gets_timeseries_analytics() -> Result<()> {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock(
                "GET",
                "/analytics/timeseries?start_date=2024-01-01&end_date=2024-01-31&interval=week",
            )
            .with_status(200)
            .with_body(fixture("timeseries.json"))
            .create_async()
            .await;

        let series = test_client(&server)
            .timeseries_analytics("2024-01-01", "2024-01-31", Interval::Week)
            .await?;
        assert_eq!(series.interval, Interval::Week);
        assert_eq!(series.data.len(), 2);
        assert_eq!(series.data[1].opens, 41);
        assert_eq!(series.totals.clicks, 11);

        Ok(())
    }

    #[tokio::test]
    async fn it_surfaces_the_api_detail_message() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/emails/missing")
            .with_status(404)
            .with_header("content-type", "application/json")
            .with_body(r#"{"detail": "No email matches the given query."}"#)
            .create_async()
            .await;

        let err = test_client(&server).get_email("missing").await.unwrap_err();

        assert!(matches!(err, Error::RequestFailed { .. }));
        assert!(err.to_string().contains("No email matches the given query."));
    }

    #[tokio::test]
    async fn it_falls_back_to_status_text_for_non_json_errors() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/emails")
            .with_status(500)
            .with_header("content-type", "text/html")
            .with_body("<html><body>Server Error</body></html>")
            .create_async()
            .await;

        let err = test_client(&server).list_emails(None).await.unwrap_err();

        match err {
            Error::RequestFailed { message } => assert_eq!(message, "Internal Server Error"),
            other => panic!("Unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn it_reports_unauthorized() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/emails")
            .with_status(401)
            .with_body("Invalid API key")
            .create_async()
            .await;

        let err = test_client(&server).list_emails(None).await.unwrap_err();
        assert_eq!(err.to_string(), "API request failed: Unauthorized");
    }

    #[tokio::test]
    async fn it_reports_a_malformed_success_body() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/emails/abc")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let err = test_client(&server).get_email("abc").await.unwrap_err();
        assert!(matches!(err, Error::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn it_reports_transport_failures() {
        // Nothing listens on the discard port
        let client = ButtondownClient::with_base_url(ApiKey::new("k"), "http://127.0.0.1:9");

        let err = client.list_tags().await.unwrap_err();

        assert!(matches!(err, Error::TransportFailure(_)));
        assert!(err.to_string().starts_with("API request failed: "));
    }
}
