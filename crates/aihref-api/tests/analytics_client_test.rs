#![allow(clippy::unwrap_used)]
// Integration tests for `AnalyticsClient` using wiremock.

use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use aihref_api::{AnalyticsClient, Error, InsightsRequest, Range};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, AnalyticsClient) {
    let server = MockServer::start().await;
    let client = AnalyticsClient::from_reqwest(&server.uri(), reqwest::Client::new()).unwrap();
    (server, client)
}

fn snapshot_body() -> serde_json::Value {
    json!({
        "siteId": "greplus",
        "range": "7d",
        "totalVisitorsTillDate": 1200,
        "todayVisitors": 14,
        "thisWeekVisitors": 96,
        "thisMonthVisitors": 410,
        "repeatVisitorsToday": 3,
        "peakVisitDay": "2024-06-10",
        "peakVisitCount": 31,
        "topCountry": "US",
        "topSource": "google",
        "avgVisitsPerDay": 13.7,
        "avgVisitsPerWeek": 96.0,
        "avgRepeatVisitorsPerDay": 2.1,
        "topPages": [{ "url": "/pricing", "count": 40 }],
        "topCountries": [{ "country": "US", "count": 60 }, { "country": "UK", "count": 40 }],
        "topSources": [{ "source": "google", "count": 70 }],
        "topLocations": [{ "city": "Austin", "state": "TX", "country": "US", "count": 9 }],
        "dailyVisitorTrends": [
            { "date": "2024-06-09", "visitors": 12, "pageviews": 30 },
            { "date": "2024-06-10", "visitors": 31, "pageviews": 77 }
        ],
        "lastUpdated": "2024-06-10T18:22:05.412"
    })
}

// ── Analytics ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_enhanced_analytics() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/analytics/enhanced"))
        .and(query_param("siteId", "greplus"))
        .and(query_param("range", "7d"))
        .respond_with(ResponseTemplate::new(200).set_body_json(snapshot_body()))
        .expect(1)
        .mount(&server)
        .await;

    let snapshot = client
        .enhanced_analytics("greplus", Range::Last7Days)
        .await
        .unwrap();

    assert_eq!(snapshot.site_id.as_deref(), Some("greplus"));
    assert_eq!(snapshot.total_visitors_till_date, 1200);
    assert_eq!(snapshot.this_month_visitors, 410);
    assert_eq!(snapshot.top_countries.len(), 2);
    assert_eq!(snapshot.top_countries[1].country, "UK");
    assert_eq!(snapshot.top_locations[0].city.as_deref(), Some("Austin"));
    assert_eq!(snapshot.daily_visitor_trends[1].visitors, 31);
    assert_eq!(
        snapshot.daily_visitor_trends[0].date.to_string(),
        "2024-06-09"
    );
}

#[tokio::test]
async fn test_enhanced_analytics_under_base_path() {
    let server = MockServer::start().await;
    let client = AnalyticsClient::from_reqwest(
        &format!("{}/backend", server.uri()),
        reqwest::Client::new(),
    )
    .unwrap();

    Mock::given(method("GET"))
        .and(path("/backend/api/analytics/enhanced"))
        .and(query_param("range", "5y"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let snapshot = client
        .enhanced_analytics("aihref", Range::Last5Years)
        .await
        .unwrap();
    assert_eq!(snapshot.total_visitors_till_date, 0);
    assert!(snapshot.daily_visitor_trends.is_empty());
}

#[tokio::test]
async fn test_combined_analytics() {
    let (server, client) = setup().await;

    let body = json!({
        "range": "1y",
        "totalVisitors": 150,
        "totalTodayVisitors": 5,
        "totalWeekVisitors": 20,
        "totalMonthVisitors": 80,
        "totalRepeatVisitors": 2,
        "sites": [{
            "siteId": "greplus",
            "siteName": "GRE Plus",
            "website": "greplus.com",
            "visitors": 150,
            "todayVisitors": 5,
            "weekVisitors": 20,
            "monthVisitors": 80,
            "repeatVisitors": 2
        }],
        "topCountries": [{ "country": "US", "count": 70 }],
        "topPages": [{ "page": "/", "count": 50 }],
        "topSources": [{ "source": "direct", "count": 30 }],
        "dailyVisitors": [{ "date": "2024-01-01", "visitors": 5, "pageviews": 9 }],
        "lastUpdated": "2024-01-02T00:00:00"
    });

    Mock::given(method("GET"))
        .and(path("/api/analytics/combined"))
        .and(query_param("range", "1y"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let combined = client.combined_analytics(Range::LastYear).await.unwrap();

    assert_eq!(combined.total_visitors, 150);
    assert_eq!(combined.sites[0].site_name, "GRE Plus");
    assert_eq!(combined.top_pages[0].page, "/");
    assert_eq!(combined.daily_visitors[0].pageviews, 9);
}

#[tokio::test]
async fn test_visitor_trends() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/analytics/visitor-trends"))
        .and(query_param("siteId", "novareaders"))
        .and(query_param("range", "1m"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "date": "2024-03-01", "visitors": 3, "pageviews": 4 },
            { "date": "2024-03-02", "visitors": 6, "pageviews": 8 }
        ])))
        .mount(&server)
        .await;

    let trends = client
        .visitor_trends("novareaders", Range::LastMonth)
        .await
        .unwrap();
    assert_eq!(trends.len(), 2);
    assert_eq!(trends[1].pageviews, 8);
}

#[tokio::test]
async fn test_analytics_summary() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/analytics/summary"))
        .and(query_param("siteId", "aihref"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "siteId": "aihref",
            "range": "30d",
            "visitors": 42,
            "pageviews": 99,
            "topPages": [{ "url": "/", "count": 12 }],
            "topCountries": []
        })))
        .mount(&server)
        .await;

    let summary = client
        .analytics_summary("aihref", Range::Last30Days)
        .await
        .unwrap();
    assert_eq!(summary.visitors, 42);
    assert_eq!(summary.pageviews, 99);
    assert_eq!(summary.top_pages[0].url, "/");
}

// ── Admin ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_trigger_aggregation() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/admin/trigger-aggregation"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "message": "Analytics aggregation completed successfully"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let status = client.trigger_aggregation().await.unwrap();
    assert!(status.is_success());
    assert!(status.message.contains("completed"));
}

#[tokio::test]
async fn test_trigger_aggregation_failure_carries_status() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/admin/trigger-aggregation"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "status": "error",
            "message": "Failed to aggregate analytics: mongo down"
        })))
        .mount(&server)
        .await;

    let result = client.trigger_aggregation().await;

    match result {
        Err(Error::Http {
            status,
            ref status_text,
            ref body,
        }) => {
            assert_eq!(status, 500);
            assert_eq!(status_text, "Internal Server Error");
            assert!(body.contains("mongo down"), "unexpected body: {body}");
        }
        other => panic!("expected Http error, got: {other:?}"),
    }
}

// ── Insights ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_insights_posts_request() {
    let (server, client) = setup().await;

    let request = InsightsRequest {
        site_id: Some("greplus".into()),
        range: Range::Last7Days,
        query: "Why did traffic drop?".into(),
        include_trends: true,
        include_predictions: false,
    };

    Mock::given(method("POST"))
        .and(path("/api/ai-analytics/insights"))
        .and(body_json(json!({
            "siteId": "greplus",
            "range": "7d",
            "query": "Why did traffic drop?",
            "includeTrends": true,
            "includePredictions": false
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "summary": "Traffic dipped mid-week.",
            "keyInsights": ["Organic search fell 12%"],
            "trends": [],
            "predictions": null,
            "recommendations": ["Refresh the pricing page"],
            "metrics": { "totalVisitors": 96 },
            "generatedAt": "2024-06-10T18:00:00",
            "siteId": "greplus",
            "range": "7d"
        })))
        .mount(&server)
        .await;

    let answer = client.insights(&request).await.unwrap();
    assert_eq!(answer.summary, "Traffic dipped mid-week.");
    assert_eq!(answer.key_insights, vec!["Organic search fell 12%"]);
    assert!(answer.predictions.is_empty());
    assert_eq!(answer.metrics["totalVisitors"], json!(96));
}

#[tokio::test]
async fn test_insights_without_site_is_rejected_locally() {
    let (server, client) = setup().await;

    let request = InsightsRequest {
        site_id: None,
        range: Range::Last7Days,
        query: "Anything?".into(),
        include_trends: false,
        include_predictions: false,
    };

    let result = client.insights(&request).await;
    assert!(matches!(result, Err(Error::InvalidSiteId { .. })));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_quick_insights_path_and_range() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/ai-analytics/quick-insights/aixrayassist"))
        .and(query_param("range", "all"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "summary": "Steady growth."
        })))
        .mount(&server)
        .await;

    let answer = client
        .quick_insights("aixrayassist", Range::AllTime)
        .await
        .unwrap();
    assert_eq!(answer.summary, "Steady growth.");
}

#[tokio::test]
async fn test_combined_quick_insights() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/ai-analytics/combined-quick-insights"))
        .and(query_param("range", "1y"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "summary": "Portfolio up 8%.",
            "recommendations": ["Cross-link the sites"]
        })))
        .mount(&server)
        .await;

    let answer = client
        .combined_quick_insights(Range::LastYear)
        .await
        .unwrap();
    assert_eq!(answer.recommendations.len(), 1);
}

// ── Error tests ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_http_error_carries_status() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = client
        .enhanced_analytics("missing", Range::Last7Days)
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "HTTP 404 Not Found");
}

#[tokio::test]
async fn test_malformed_body_is_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/analytics/enhanced"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let result = client.enhanced_analytics("greplus", Range::Last7Days).await;

    match result {
        Err(Error::Deserialization { ref body, .. }) => assert_eq!(body, "<html>oops</html>"),
        other => panic!("expected Deserialization error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_empty_site_id_makes_no_request() {
    let (server, client) = setup().await;

    let result = client.enhanced_analytics("", Range::Last7Days).await;

    assert!(matches!(result, Err(Error::InvalidSiteId { .. })));
    assert!(server.received_requests().await.unwrap().is_empty());
}
