//! In-process fake of the projects and meetings service.
//!
//! A stateful [`Respond`] implementation mounted on a wiremock server.
//! By default it follows the contract; [`Quirks`] switch on specific
//! misbehaviours so tests can check that the harness notices them.

#![allow(dead_code, clippy::unwrap_used, clippy::significant_drop_tightening)]

use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use eavesdrop_domain::resource::{MEETING_ROOT, PROJECT_ROOT, parse_year};
use eavesdrop_domain::{Meeting, Project, ResourceId};
use eavesdrop_infrastructure::XmlDocument;
use wiremock::matchers::any;
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

/// Path of the projects collection on the fake server.
pub const COLLECTION_PATH: &str = "/myeavesdrop/projects/";

/// Deliberate deviations from the contract.
#[derive(Debug, Clone, Copy, Default)]
pub struct Quirks {
    /// Accept empty and whitespace-only names and descriptions.
    pub accept_blank_fields: bool,
    /// Keep meetings reachable after their project is deleted.
    pub no_cascade: bool,
    /// Answer 404 for every PUT on a malformed id.
    pub put_invalid_id_not_found: bool,
    /// Serve a meeting through any project path.
    pub ignore_meeting_owner: bool,
    /// Accept meeting POSTs under any well-formed project id, live or not.
    pub unchecked_meeting_owner: bool,
}

#[derive(Debug, Default)]
struct State {
    next_id: u64,
    projects: BTreeMap<u64, Project>,
    meetings: BTreeMap<u64, (u64, Meeting)>,
}

/// The fake service. Clones share state.
#[derive(Clone)]
pub struct FakeService {
    base_url: String,
    quirks: Quirks,
    state: Arc<Mutex<State>>,
}

impl FakeService {
    /// Starts a wiremock server running the fake and returns both.
    pub async fn start(quirks: Quirks) -> (MockServer, Self) {
        let server = MockServer::start().await;
        let fake = Self {
            base_url: format!("{}{COLLECTION_PATH}", server.uri()),
            quirks,
            state: Arc::new(Mutex::new(State::default())),
        };
        Mock::given(any())
            .respond_with(fake.clone())
            .mount(&server)
            .await;
        (server, fake)
    }

    /// Projects collection URL, ending in `/`.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Number of live projects.
    pub fn project_count(&self) -> usize {
        self.state.lock().unwrap().projects.len()
    }

    /// Number of live meetings.
    pub fn meeting_count(&self) -> usize {
        self.state.lock().unwrap().meetings.len()
    }

    fn handle(&self, method: &str, segments: &[&str], body: &str) -> ResponseTemplate {
        let mut state = self.state.lock().unwrap();
        match (method, segments) {
            ("POST", []) => match self.read_project(body) {
                Some(project) => {
                    let id = state.allocate();
                    state.projects.insert(id, project);
                    created(&format!("{}{id}", self.base_url))
                }
                None => status(400),
            },
            ("PUT", [raw]) if ResourceId::from_str(raw).is_err() => self.invalid_put(raw),
            ("GET" | "PUT" | "DELETE", [raw]) => {
                let Some(id) = state.project_id(raw) else {
                    return status(404);
                };
                match method {
                    "GET" => xml(&state.render_project(id)),
                    "PUT" => match self.read_project(body) {
                        Some(project) => {
                            state.projects.insert(id, project);
                            status(204)
                        }
                        None => status(400),
                    },
                    _ => {
                        state.projects.remove(&id);
                        if !self.quirks.no_cascade {
                            state.meetings.retain(|_, (owner, _)| *owner != id);
                        }
                        status(200)
                    }
                }
            }
            ("POST", [raw, "meetings"]) => {
                let Some(project_id) = state.project_id(raw).or_else(|| self.unchecked_owner(raw))
                else {
                    return status(404);
                };
                match self.read_meeting(body) {
                    Some(meeting) => {
                        let id = state.allocate();
                        state.meetings.insert(id, (project_id, meeting));
                        created(&format!("{}{project_id}/meetings/{id}", self.base_url))
                    }
                    None => status(400),
                }
            }
            ("PUT", [raw, "meetings", meeting_raw])
                if ResourceId::from_str(meeting_raw).is_err()
                    && state.project_id(raw).is_some() =>
            {
                self.invalid_put(meeting_raw)
            }
            ("GET" | "PUT" | "DELETE", [raw, "meetings", meeting_raw]) => {
                let Some(project_id) = state
                    .project_id(raw)
                    .or_else(|| self.orphan_owner(&state, raw))
                    .or_else(|| self.unchecked_owner(raw))
                else {
                    return status(404);
                };
                let Some(id) = self.meeting_id(&state, project_id, meeting_raw) else {
                    return status(404);
                };
                match method {
                    "GET" => {
                        let (_, meeting) = &state.meetings[&id];
                        xml(&meeting.clone().with_id(ResourceId::new(id)).to_xml())
                    }
                    "PUT" => match self.read_meeting(body) {
                        Some(meeting) => {
                            state.meetings.insert(id, (project_id, meeting));
                            status(204)
                        }
                        None => status(400),
                    },
                    _ => {
                        state.meetings.remove(&id);
                        status(200)
                    }
                }
            }
            _ => status(404),
        }
    }

    fn invalid_put(&self, raw: &str) -> ResponseTemplate {
        if !self.quirks.put_invalid_id_not_found && raw.starts_with('-') {
            status(400)
        } else {
            status(404)
        }
    }

    /// Without cascading deletes, meetings of a deleted project stay
    /// reachable through its path.
    fn orphan_owner(&self, state: &State, raw: &str) -> Option<u64> {
        let id = ResourceId::from_str(raw).ok()?.get();
        (self.quirks.no_cascade && state.meetings.values().any(|(owner, _)| *owner == id))
            .then_some(id)
    }

    fn unchecked_owner(&self, raw: &str) -> Option<u64> {
        let id = ResourceId::from_str(raw).ok()?.get();
        self.quirks.unchecked_meeting_owner.then_some(id)
    }

    fn meeting_id(&self, state: &State, project_id: u64, raw: &str) -> Option<u64> {
        let id = ResourceId::from_str(raw).ok()?.get();
        let (owner, _) = state.meetings.get(&id)?;
        (self.quirks.ignore_meeting_owner || *owner == project_id).then_some(id)
    }

    /// Text of a required field. Whitespace-only text reads as empty.
    fn required<'a>(&self, doc: &'a XmlDocument, path: &str) -> Option<&'a str> {
        let text = doc.find(path)?.text();
        (self.quirks.accept_blank_fields || !text.is_empty()).then_some(text)
    }

    fn read_project(&self, body: &str) -> Option<Project> {
        let doc = XmlDocument::parse(body).ok()?;
        if doc.root().name != PROJECT_ROOT {
            return None;
        }
        let project = Project::new(
            self.required(&doc, "name")?,
            self.required(&doc, "description")?,
        );
        if !self.quirks.accept_blank_fields {
            project.validate().ok()?;
        }
        Some(project)
    }

    fn read_meeting(&self, body: &str) -> Option<Meeting> {
        let doc = XmlDocument::parse(body).ok()?;
        if doc.root().name != MEETING_ROOT {
            return None;
        }
        let name = self.required(&doc, "name")?;
        let year = parse_year(doc.text_at("year")?).ok()?;
        Some(Meeting::new(name, year))
    }
}

impl State {
    const fn allocate(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn project_id(&self, raw: &str) -> Option<u64> {
        let id = ResourceId::from_str(raw).ok()?.get();
        self.projects.contains_key(&id).then_some(id)
    }

    fn render_project(&self, id: u64) -> String {
        let mut project = self.projects[&id].clone().with_id(ResourceId::new(id));
        project.meetings = self
            .meetings
            .iter()
            .filter(|(_, (owner, _))| *owner == id)
            .map(|(meeting_id, (_, meeting))| {
                meeting.clone().with_id(ResourceId::new(*meeting_id))
            })
            .collect();
        project.to_xml()
    }
}

impl Respond for FakeService {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let Some(rest) = request.url.path().strip_prefix(COLLECTION_PATH.trim_end_matches('/'))
        else {
            return status(404);
        };
        let segments: Vec<&str> = rest.split('/').filter(|s| !s.is_empty()).collect();
        let body = String::from_utf8_lossy(&request.body);
        self.handle(request.method.as_str(), &segments, &body)
    }
}

fn status(code: u16) -> ResponseTemplate {
    ResponseTemplate::new(code)
}

fn created(location: &str) -> ResponseTemplate {
    ResponseTemplate::new(201).insert_header("Location", location)
}

fn xml(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.as_bytes().to_vec(), "application/xml")
}
