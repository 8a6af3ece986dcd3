//! Common test utilities and fixtures

#![allow(dead_code)]

use repo_pulse::github::HostingClient;
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TEST_REPO: &str = "org/repo";
pub const TEST_OWNER: &str = "org";
pub const TEST_REPO_NAME: &str = "repo";

/// Client pointed at a mock server
pub async fn client_for(server: &MockServer) -> HostingClient {
    HostingClient::with_base_url("fake-token", Some(&server.uri()))
        .await
        .expect("Failed to create client")
}

/// Mount GET /repos/{owner}/{repo}
pub async fn mount_repository(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(format!("/repos/{}", TEST_REPO)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1,
            "full_name": TEST_REPO,
            "stargazers_count": 1200,
            "forks_count": 340
        })))
        .mount(server)
        .await;
}

/// A search result item; `pull` adds the pull request marker
pub fn issue_item(number: u64, created: &str, closed: Option<&str>, pull: bool) -> Value {
    let mut item = json!({
        "number": number,
        "title": format!("Issue {}", number),
        "created_at": format!("{}T10:00:00Z", created),
        "closed_at": closed.map(|c| format!("{}T18:30:00Z", c)),
        "labels": [{"name": "bug"}],
        "state": if closed.is_some() { "closed" } else { "open" },
        "user": {"login": "octocat"}
    });
    if pull {
        item["pull_request"] = json!({"url": format!("https://api.github.com/repos/org/repo/pulls/{}", number)});
    }
    item
}

pub fn search_body(total_count: u64, items: Vec<Value>) -> Value {
    json!({
        "total_count": total_count,
        "incomplete_results": false,
        "items": items
    })
}

pub fn commit_node(oid: &str, login: Option<&str>, date: &str) -> Value {
    json!({
        "oid": oid,
        "committedDate": format!("{}T12:00:00Z", date),
        "messageHeadline": format!("Commit {}", oid),
        "author": {
            "name": "Someone",
            "email": "someone@example.com",
            "user": login.map(|l| json!({"login": l}))
        }
    })
}

/// A default-branch history page
pub fn history_page(nodes: Vec<Value>, next_cursor: Option<&str>) -> Value {
    json!({
        "data": {"repository": {"defaultBranchRef": {"target": {"history": {
            "pageInfo": {"hasNextPage": next_cursor.is_some(), "endCursor": next_cursor},
            "nodes": nodes
        }}}}}
    })
}

/// A branch refs page
pub fn refs_page(nodes: Vec<Value>, next_cursor: Option<&str>) -> Value {
    json!({
        "data": {"repository": {"refs": {
            "pageInfo": {"hasNextPage": next_cursor.is_some(), "endCursor": next_cursor},
            "nodes": nodes
        }}}
    })
}

pub fn branch_node(name: &str, commit_dates: &[&str]) -> Value {
    let nodes: Vec<Value> = commit_dates
        .iter()
        .map(|d| json!({"committedDate": format!("{}T08:00:00Z", d)}))
        .collect();
    json!({"name": name, "target": {"history": {"nodes": nodes}}})
}

pub fn ok_json(body: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(body)
}
