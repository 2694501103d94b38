/// Jolokia HTTP/JSON transport.
///
/// Every call is one blocking `POST` of a single JSON request to the agent's
/// base URL. The agent answers `200` with its own `status` field in the body,
/// so the body is always decoded and classified.
use std::time::Duration;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, trace};

use super::client::{Location, Transport};
use super::errors::JmxError;
use super::value::RawValue;

/// Default mount point of the Jolokia agent servlet.
pub const DEFAULT_AGENT_PATH: &str = "/jolokia";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Exception class names that mean "no such bean".
const BEAN_MISSING_TYPES: &[&str] = &[
    "javax.management.InstanceNotFoundException",
    "javax.management.MalformedObjectNameException",
];

/// Exception class name that means "no such attribute".
const ATTRIBUTE_MISSING_TYPE: &str = "javax.management.AttributeNotFoundException";

/// Transport settings taken from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JolokiaOptions {
    /// Path of the agent below `http://HOST:PORT`.
    pub agent_path: String,
    /// Timeout applied to each request.
    pub timeout: Duration,
}

/// Build the agent base URL for a location.
#[must_use]
pub fn agent_url(location: &Location, agent_path: &str) -> String {
    let path = agent_path.trim_end_matches('/');
    if path.is_empty() || path.starts_with('/') {
        format!("http://{location}{path}")
    } else {
        format!("http://{location}/{path}")
    }
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum Request<'a> {
    Version,
    Search { mbean: &'a str },
    List { path: String },
    Read { mbean: &'a str, attribute: &'a str },
}

#[derive(Debug, Deserialize)]
struct Response {
    status: u16,
    #[serde(default)]
    value: Value,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_type: Option<String>,
}

impl Response {
    fn is_ok(&self) -> bool {
        self.status == 200
    }

    fn error_type_is(&self, names: &[&str]) -> bool {
        self.error_type
            .as_deref()
            .is_some_and(|t| names.contains(&t))
    }

    fn remote_error(&self, context: &str) -> JmxError {
        JmxError::Remote {
            context: context.to_owned(),
            message: self
                .error
                .clone()
                .unwrap_or_else(|| format!("status {}", self.status)),
        }
    }
}

/// Blocking client for one Jolokia agent.
pub struct JolokiaTransport {
    url: String,
    client: Option<Client>,
}

impl JolokiaTransport {
    /// Build the HTTP client and verify the agent answers a `version` request.
    ///
    /// # Errors
    ///
    /// `JmxError::Connection` if the client cannot be built or the agent does
    /// not answer successfully.
    pub fn connect(location: &Location, opts: &JolokiaOptions) -> Result<Self, JmxError> {
        let cannot_connect = || JmxError::connection(format!("Cannot connect jmx server ({location})."));
        let client = Client::builder()
            .timeout(opts.timeout)
            .user_agent(concat!("jkl/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                debug!(error = %e, "http client build failed");
                cannot_connect()
            })?;
        let transport = Self {
            url: agent_url(location, &opts.agent_path),
            client: Some(client),
        };
        let version = transport.send(&Request::Version).map_err(|e| {
            debug!(error = %e, "version request failed");
            cannot_connect()
        })?;
        if !version.is_ok() {
            debug!(status = version.status, "version request rejected");
            return Err(cannot_connect());
        }
        debug!(url = %transport.url, agent = %version.value, "agent answered");
        Ok(transport)
    }

    fn send(&self, request: &Request<'_>) -> Result<Response, JmxError> {
        let client = self
            .client
            .as_ref()
            .ok_or_else(|| JmxError::connection("Connection already closed."))?;
        trace!(url = %self.url, ?request, "jolokia request");
        let response = client
            .post(&self.url)
            .json(request)
            .send()
            .map_err(|e| JmxError::connection(format!("Cannot reach jmx server ({}): {e}", self.url)))?;
        let body: Response = response
            .json()
            .map_err(|e| JmxError::connection(format!("Unreadable response from {}: {e}", self.url)))?;
        trace!(status = body.status, "jolokia response");
        Ok(body)
    }
}

/// Split an object name into its `list` path, escaping `!` and `/`.
///
/// Returns `None` when the name has no domain separator.
fn list_path(bean: &str) -> Option<String> {
    let (domain, properties) = bean.split_once(':')?;
    if domain.is_empty() || properties.is_empty() {
        return None;
    }
    let escape = |s: &str| s.replace('!', "!!").replace('/', "!/");
    Some(format!("{}/{}", escape(domain), escape(properties)))
}

impl Transport for JolokiaTransport {
    fn bean_names(&self) -> Result<Vec<String>, JmxError> {
        let response = self.send(&Request::Search { mbean: "*:*" })?;
        if !response.is_ok() {
            return Err(JmxError::connection(format!(
                "Cannot retrieve mbean. {}",
                response.remote_error("*:*")
            )));
        }
        Ok(response
            .value
            .as_array()
            .map(|names| names.iter().map(super::value::render).collect())
            .unwrap_or_default())
    }

    fn attribute_names(&self, bean: &str) -> Result<Vec<String>, JmxError> {
        let path = list_path(bean).ok_or_else(|| JmxError::bean_not_found(bean))?;
        let response = self.send(&Request::List { path })?;
        if !response.is_ok() {
            return Err(match response.status {
                400 | 404 => JmxError::bean_not_found(bean),
                _ => response.remote_error(bean),
            });
        }
        // An unknown bean under a known domain yields an empty object.
        let info = response
            .value
            .as_object()
            .filter(|info| !info.is_empty())
            .ok_or_else(|| JmxError::bean_not_found(bean))?;
        Ok(info
            .get("attr")
            .and_then(Value::as_object)
            .map(|attrs| attrs.keys().cloned().collect())
            .unwrap_or_default())
    }

    fn attribute(&self, bean: &str, attribute: &str) -> Result<RawValue, JmxError> {
        if list_path(bean).is_none() {
            return Err(JmxError::bean_not_found(bean));
        }
        let response = self.send(&Request::Read {
            mbean: bean,
            attribute,
        })?;
        if response.is_ok() {
            return Ok(RawValue::from_json(&response.value));
        }
        Err(if response.error_type_is(BEAN_MISSING_TYPES) {
            JmxError::bean_not_found(bean)
        } else if response.error_type_is(&[ATTRIBUTE_MISSING_TYPE]) || response.status == 404 {
            JmxError::attribute_not_found(bean, attribute)
        } else {
            response.remote_error(&format!("{bean}::{attribute}"))
        })
    }

    fn close(&mut self) {
        self.client = None;
    }
}

#[cfg(test)]
mod tests {
    use httpmock::prelude::*;
    use serde_json::json;

    use super::*;

    const MEMORY: &str = "java.lang:type=Memory";

    fn options() -> JolokiaOptions {
        JolokiaOptions {
            agent_path: DEFAULT_AGENT_PATH.to_owned(),
            timeout: Duration::from_secs(5),
        }
    }

    fn server_location(server: &MockServer) -> Location {
        Location {
            host: server.host(),
            port: server.port(),
        }
    }

    /// Answer one exact Jolokia request body with `reply`.
    fn reply(server: &MockServer, request: Value, reply: Value) {
        server.mock(|when, then| {
            when.method(POST).path(DEFAULT_AGENT_PATH).json_body(request);
            then.status(200)
                .header("content-type", "application/json")
                .json_body(reply);
        });
    }

    fn connected(server: &MockServer) -> JolokiaTransport {
        reply(
            server,
            json!({"type": "version"}),
            json!({"status": 200, "value": {"agent": "2.0.2", "protocol": "7.2"}}),
        );
        JolokiaTransport::connect(&server_location(server), &options()).unwrap()
    }

    fn read_reply(server: &MockServer, mbean: &str, attribute: &str, body: Value) {
        reply(
            server,
            json!({"type": "read", "mbean": mbean, "attribute": attribute}),
            body,
        );
    }

    fn list_reply(server: &MockServer, path: &str, body: Value) {
        reply(server, json!({"type": "list", "path": path}), body);
    }

    fn loc() -> Location {
        Location {
            host: "localhost".to_owned(),
            port: 8778,
        }
    }

    #[test]
    fn test_agent_url() {
        assert_eq!(agent_url(&loc(), "/jolokia"), "http://localhost:8778/jolokia");
        assert_eq!(agent_url(&loc(), "/jolokia/"), "http://localhost:8778/jolokia");
        assert_eq!(agent_url(&loc(), "actuator/jolokia"), "http://localhost:8778/actuator/jolokia");
        assert_eq!(agent_url(&loc(), ""), "http://localhost:8778");
    }

    #[test]
    fn test_list_path_escapes() {
        assert_eq!(list_path("java.lang:type=Memory").as_deref(), Some("java.lang/type=Memory"));
        assert_eq!(
            list_path("a/b:name=x!y,type=T").as_deref(),
            Some("a!/b/name=x!!y,type=T")
        );
        assert_eq!(list_path("no-domain"), None);
        assert_eq!(list_path(":type=X"), None);
    }

    #[test]
    fn test_request_shapes() {
        let read = serde_json::to_value(Request::Read {
            mbean: "java.lang:type=Memory",
            attribute: "HeapMemoryUsage",
        })
        .unwrap();
        assert_eq!(
            read,
            json!({"type": "read", "mbean": "java.lang:type=Memory", "attribute": "HeapMemoryUsage"})
        );
        let version = serde_json::to_value(Request::Version).unwrap();
        assert_eq!(version, json!({"type": "version"}));
    }

    #[test]
    fn test_response_error_classification() {
        let response: Response = serde_json::from_value(json!({
            "status": 404,
            "error_type": "javax.management.InstanceNotFoundException",
            "error": "javax.management.InstanceNotFoundException : foo:type=Bar"
        }))
        .unwrap();
        assert!(!response.is_ok());
        assert!(response.error_type_is(BEAN_MISSING_TYPES));
        assert_eq!(response.value, Value::Null);
    }

    #[test]
    fn test_closed_transport_reports_connection_error() {
        let mut transport = JolokiaTransport {
            url: "http://localhost:1/jolokia".to_owned(),
            client: None,
        };
        transport.close();
        assert!(matches!(
            transport.bean_names(),
            Err(JmxError::Connection { .. })
        ));
    }

    #[test]
    fn test_connect_refused() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let location = Location {
            host: "127.0.0.1".to_owned(),
            port,
        };
        let err = JolokiaTransport::connect(&location, &options()).err().unwrap();
        assert_eq!(
            err,
            JmxError::connection(format!("Cannot connect jmx server (127.0.0.1:{port})."))
        );
    }

    #[test]
    fn test_connect_rejected_version() {
        let server = MockServer::start();
        reply(
            &server,
            json!({"type": "version"}),
            json!({"status": 403, "error": "Access denied"}),
        );
        let location = server_location(&server);
        let err = JolokiaTransport::connect(&location, &options()).err().unwrap();
        assert_eq!(
            err,
            JmxError::connection(format!("Cannot connect jmx server ({location})."))
        );
    }

    #[test]
    fn test_connect_wrong_agent_path() {
        let server = MockServer::start();
        let location = server_location(&server);
        let opts = JolokiaOptions {
            agent_path: "/not-jolokia".to_owned(),
            ..options()
        };
        let err = JolokiaTransport::connect(&location, &opts).err().unwrap();
        assert!(matches!(err, JmxError::Connection { .. }));
    }

    #[test]
    fn test_search_returns_names_as_sent() {
        let server = MockServer::start();
        let transport = connected(&server);
        reply(
            &server,
            json!({"type": "search", "mbean": "*:*"}),
            json!({"status": 200, "value": ["java.lang:type=Runtime", "app:type=Memory"]}),
        );
        assert_eq!(
            transport.bean_names().unwrap(),
            vec!["java.lang:type=Runtime", "app:type=Memory"]
        );
    }

    #[test]
    fn test_search_failure_is_connection_error() {
        let server = MockServer::start();
        let transport = connected(&server);
        reply(
            &server,
            json!({"type": "search", "mbean": "*:*"}),
            json!({"status": 500, "error": "boom"}),
        );
        assert!(matches!(
            transport.bean_names(),
            Err(JmxError::Connection { .. })
        ));
    }

    #[test]
    fn test_list_keeps_attribute_order() {
        let server = MockServer::start();
        let transport = connected(&server);
        list_reply(
            &server,
            "java.lang/type=Memory",
            json!({"status": 200, "value": {
                "desc": "Information on the management interface of the MBean",
                "attr": {
                    "Verbose": {"rw": true, "type": "boolean"},
                    "HeapMemoryUsage": {"rw": false, "type": "javax.management.openmbean.CompositeData"}
                },
                "op": {"gc": {"args": [], "ret": "void"}}
            }}),
        );
        assert_eq!(
            transport.attribute_names(MEMORY).unwrap(),
            vec!["Verbose", "HeapMemoryUsage"]
        );
    }

    #[test]
    fn test_list_missing_bean() {
        let server = MockServer::start();
        let transport = connected(&server);
        list_reply(&server, "foo/type=Bar", json!({"status": 404, "error": "not found"}));
        list_reply(&server, "foo/type=Baz", json!({"status": 400, "error": "Invalid path"}));
        list_reply(&server, "java.lang/type=Nope", json!({"status": 200, "value": {}}));

        for bean in ["foo:type=Bar", "foo:type=Baz", "java.lang:type=Nope"] {
            assert_eq!(
                transport.attribute_names(bean).unwrap_err(),
                JmxError::bean_not_found(bean)
            );
        }
    }

    #[test]
    fn test_list_unclassified_error_is_remote() {
        let server = MockServer::start();
        let transport = connected(&server);
        list_reply(
            &server,
            "java.lang/type=Memory",
            json!({"status": 500, "error_type": "java.lang.IllegalStateException", "error": "boom"}),
        );
        assert_eq!(
            transport.attribute_names(MEMORY).unwrap_err(),
            JmxError::Remote {
                context: MEMORY.to_owned(),
                message: "boom".to_owned(),
            }
        );
    }

    #[test]
    fn test_read_instance_not_found() {
        let server = MockServer::start();
        let transport = connected(&server);
        read_reply(
            &server,
            "foo:type=Bar",
            "Baz",
            json!({
                "status": 404,
                "error_type": "javax.management.InstanceNotFoundException",
                "error": "javax.management.InstanceNotFoundException : foo:type=Bar"
            }),
        );
        assert_eq!(
            transport.attribute("foo:type=Bar", "Baz").unwrap_err().to_string(),
            "Invalid mbean name specified (foo:type=Bar)."
        );
    }

    #[test]
    fn test_read_malformed_object_name() {
        let server = MockServer::start();
        let transport = connected(&server);
        read_reply(
            &server,
            "foo:=",
            "Baz",
            json!({
                "status": 400,
                "error_type": "javax.management.MalformedObjectNameException",
                "error": "Invalid key"
            }),
        );
        assert_eq!(
            transport.attribute("foo:=", "Baz").unwrap_err(),
            JmxError::bean_not_found("foo:=")
        );
    }

    #[test]
    fn test_read_attribute_not_found() {
        let server = MockServer::start();
        let transport = connected(&server);
        read_reply(
            &server,
            MEMORY,
            "Nope",
            json!({
                "status": 404,
                "error_type": "javax.management.AttributeNotFoundException",
                "error": "No such attribute: Nope"
            }),
        );
        assert_eq!(
            transport.attribute(MEMORY, "Nope").unwrap_err().to_string(),
            "Invalid attribute name specified (java.lang:type=Memory::Nope)."
        );
    }

    #[test]
    fn test_read_bare_404() {
        let server = MockServer::start();
        let transport = connected(&server);
        read_reply(&server, MEMORY, "Gone", json!({"status": 404}));
        assert_eq!(
            transport.attribute(MEMORY, "Gone").unwrap_err(),
            JmxError::attribute_not_found(MEMORY, "Gone")
        );
    }

    #[test]
    fn test_read_unclassified_error_is_remote() {
        let server = MockServer::start();
        let transport = connected(&server);
        read_reply(
            &server,
            MEMORY,
            "HeapMemoryUsage",
            json!({
                "status": 500,
                "error_type": "java.lang.UnsupportedOperationException",
                "error": "not readable"
            }),
        );
        assert_eq!(
            transport.attribute(MEMORY, "HeapMemoryUsage").unwrap_err(),
            JmxError::Remote {
                context: "java.lang:type=Memory::HeapMemoryUsage".to_owned(),
                message: "not readable".to_owned(),
            }
        );
    }

    #[test]
    fn test_read_bean_without_domain_skips_request() {
        let server = MockServer::start();
        let transport = connected(&server);
        // No read is mocked: a request would come back unmatched and fail as a
        // connection error instead.
        assert_eq!(
            transport.attribute("foo", "bar").unwrap_err(),
            JmxError::bean_not_found("foo")
        );
    }

    #[test]
    fn test_read_value_shapes() {
        let server = MockServer::start();
        let transport = connected(&server);
        read_reply(
            &server,
            MEMORY,
            "HeapMemoryUsage",
            json!({"status": 200, "value": {"used": 75, "max": 200}}),
        );
        read_reply(
            &server,
            MEMORY,
            "PoolNames",
            json!({"status": 200, "value": ["Eden Space", "Old Gen"]}),
        );
        read_reply(&server, MEMORY, "Missing", json!({"status": 200, "value": null}));

        assert_eq!(
            transport.attribute(MEMORY, "HeapMemoryUsage").unwrap(),
            RawValue::Composite(vec![
                ("used".to_owned(), "75".to_owned()),
                ("max".to_owned(), "200".to_owned()),
            ])
        );
        assert_eq!(
            transport.attribute(MEMORY, "PoolNames").unwrap(),
            RawValue::Sequence(vec!["Eden Space".to_owned(), "Old Gen".to_owned()])
        );
        assert_eq!(
            transport.attribute(MEMORY, "Missing").unwrap(),
            RawValue::Scalar("null".to_owned())
        );
    }
}
