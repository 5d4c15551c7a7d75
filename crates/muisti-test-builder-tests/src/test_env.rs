//! Hermetic Muisti API for E2E testing
//!
//! [`MockApi`] runs a mockito server standing in for both the REST API
//! (`/v1`) and the upload endpoint (`/files`), and hands out builders wired
//! to it.

use anyhow::Result;
use mockito::{Matcher, Mock, Server, ServerGuard};
use muisti_test_builder::{Logger, Settings, TestBuilder};
use serde_json::Value;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use crate::fixtures;

pub const ACCESS_TOKEN: &str = "e2e-access-token";

/// Paths of the requests a mock served, in arrival order
#[derive(Debug, Clone, Default)]
pub struct RequestLog {
    paths: Arc<Mutex<Vec<String>>>,
}

impl RequestLog {
    fn record(&self, path: &str) {
        if let Ok(mut paths) = self.paths.lock() {
            paths.push(path.to_string());
        }
    }

    pub fn paths(&self) -> Vec<String> {
        self.paths.lock().map(|paths| paths.clone()).unwrap_or_default()
    }
}

/// Mock Muisti API server
pub struct MockApi {
    server: ServerGuard,
}

impl MockApi {
    pub fn new() -> Self {
        Logger::init_for_tests(Settings::default().to_logger_config());
        Self {
            server: Server::new(),
        }
    }

    pub fn server(&mut self) -> &mut ServerGuard {
        &mut self.server
    }

    /// Settings pointing at this server, with the bundled test resources
    pub fn settings(&self) -> Settings {
        Settings {
            access_token: Some(ACCESS_TOKEN.to_string()),
            resources_dir: fixtures::resources_dir(),
            ..Settings::for_server(&self.server.url())
        }
    }

    pub fn builder(&self) -> Result<TestBuilder> {
        Ok(TestBuilder::new(self.settings(), None)?)
    }

    pub fn group_content_versions_path(exhibition_id: &str) -> String {
        format!("/v1/exhibitions/{}/groupContentVersions", exhibition_id)
    }

    pub fn group_content_version_path(exhibition_id: &str, version_id: Uuid) -> String {
        format!(
            "{}/{}",
            Self::group_content_versions_path(exhibition_id),
            version_id
        )
    }

    /// Accept one authenticated create and answer with `body`
    pub fn mock_create_group_content_version(&mut self, body: &Value) -> Mock {
        self.server
            .mock(
                "POST",
                Self::group_content_versions_path(fixtures::EXHIBITION_ID).as_str(),
            )
            .match_header("authorization", format!("Bearer {}", ACCESS_TOKEN).as_str())
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .expect(1)
            .create()
    }

    pub fn mock_find_group_content_version(&mut self, version_id: Uuid, body: &Value) -> Mock {
        self.server
            .mock(
                "GET",
                Self::group_content_version_path(fixtures::EXHIBITION_ID, version_id).as_str(),
            )
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .create()
    }

    /// Expect exactly one delete of `version_id`, recording it in `log`
    pub fn mock_delete_group_content_version(&mut self, version_id: Uuid, log: &RequestLog) -> Mock {
        let log = log.clone();
        self.server
            .mock(
                "DELETE",
                Self::group_content_version_path(fixtures::EXHIBITION_ID, version_id).as_str(),
            )
            .match_header("authorization", format!("Bearer {}", ACCESS_TOKEN).as_str())
            .with_status(204)
            .with_body_from_request(move |request| {
                log.record(request.path());
                Vec::new()
            })
            .expect(1)
            .create()
    }

    /// Accept one multipart upload into `folder` and answer with `body`
    pub fn mock_upload(&mut self, folder: &str, content_type: &str, body: &Value) -> Mock {
        self.server
            .mock("POST", "/files")
            .match_header(
                "content-type",
                Matcher::Regex("^multipart/form-data".to_string()),
            )
            .match_body(Matcher::AllOf(vec![
                Matcher::Regex(format!("Content-Type: {}", content_type)),
                Matcher::Regex(format!("name=\"folder\"\r\n\r\n{}", folder)),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .expect(1)
            .create()
    }

    pub fn mock_delete_stored_file(&mut self, stored_file_id: &str, log: &RequestLog) -> Mock {
        let log = log.clone();
        self.server
            .mock("DELETE", format!("/v1/files/{}", stored_file_id).as_str())
            .match_header("authorization", format!("Bearer {}", ACCESS_TOKEN).as_str())
            .with_status(204)
            .with_body_from_request(move |request| {
                log.record(request.path());
                Vec::new()
            })
            .expect(1)
            .create()
    }
}

impl Default for MockApi {
    fn default() -> Self {
        Self::new()
    }
}
