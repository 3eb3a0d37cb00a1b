//! In-memory stand-in for the Student Management System pages
//!
//! Just enough behaviour for the catalog: landing page with register and
//! login forms, an enrollment page behind a session, native dialogs, and
//! knobs for the misbehaviours the suite has to tolerate or catch.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use sms_e2e::selectors::{
    LOGIN_EMAIL, LOGIN_FORM, LOGIN_PASSWORD, LOGIN_SUBMIT, LOGOUT_BUTTON, REGISTER_FORM,
    REGISTER_PASSWORD, REGISTER_SUBMIT, WELCOME_TEXT,
};
use sms_e2e::{E2eResult, Locator, PageElement, Session};

pub const BASE: &str = "http://sms.test/";
const TITLE: &str = "Student Management System";
const BOOTSTRAP_CSS: &str = "https://cdn.jsdelivr.net/npm/bootstrap@5.3.0/dist/css/bootstrap.min.css";
const BOOTSTRAP_JS: &str = "https://cdn.jsdelivr.net/npm/bootstrap@5.3.0/dist/js/bootstrap.bundle.min.js";
const PLAIN_CSS: &str = "/assets/site.css";
const PLAIN_JS: &str = "https://code.jquery.com/jquery-3.7.1.min.js";

#[derive(Debug, Clone, Copy)]
pub struct Behavior {
    /// Feedback through `alert()` rather than redirects
    pub alerts: bool,
    /// `/logout.php` actually ends the session
    pub logout_works: bool,
    /// `/enroll.php` redirects anonymous visitors
    pub protects_enroll: bool,
    /// Landing `<h2>` differs from the title
    pub wrong_heading: bool,
    /// Every dialog shows this text instead of the real message
    pub dialog_text: Option<&'static str>,
    /// Password inputs are `type="text"`
    pub unmasked_password: bool,
    /// No input carries `required`
    pub missing_required: bool,
    /// Email inputs are `type="text"`
    pub plain_email_type: bool,
    pub no_bootstrap_css: bool,
    pub no_bootstrap_js: bool,
    /// No `.container` wrapper
    pub no_container: bool,
    /// Authenticated layout without the Welcome heading
    pub no_welcome: bool,
    /// Correct credentials are still refused
    pub login_rejects: bool,
}

impl Default for Behavior {
    fn default() -> Self {
        Self {
            alerts: true,
            logout_works: true,
            protects_enroll: true,
            wrong_heading: false,
            dialog_text: None,
            unmasked_password: false,
            missing_required: false,
            plain_email_type: false,
            no_bootstrap_css: false,
            no_bootstrap_js: false,
            no_container: false,
            no_welcome: false,
            login_rejects: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Input {
    RegName,
    RegEmail,
    RegPassword,
    LoginEmail,
    LoginPassword,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Page {
    Landing,
    Enroll,
}

#[derive(Debug, Clone, Copy)]
enum Kind {
    Heading,
    Form,
    Field(Input),
    RegisterSubmit,
    LoginSubmit,
    LogoutButton,
    Container,
    Welcome,
    Stylesheet,
    Script,
}

struct User {
    name: String,
    password: String,
}

struct SiteState {
    behavior: Behavior,
    url: String,
    page: Page,
    session: Option<String>,
    users: HashMap<String, User>,
    registrations: Vec<String>,
    alert: Option<String>,
    inputs: HashMap<Input, String>,
    quit: bool,
}

impl SiteState {
    fn goto_path(&mut self, path: &str) {
        self.inputs.clear();
        self.alert = None;
        match path {
            "logout.php" => {
                if self.behavior.logout_works {
                    self.session = None;
                }
                self.land("index.php");
            }
            "enroll.php" => {
                if self.session.is_some() || !self.behavior.protects_enroll {
                    self.page = Page::Enroll;
                    self.url = format!("{}enroll.php", BASE);
                } else {
                    self.land("index.php");
                }
            }
            "" => self.land(""),
            _ => self.land("index.php"),
        }
    }

    fn land(&mut self, path: &str) {
        self.page = Page::Landing;
        self.url = format!("{}{}", BASE, path);
    }

    fn anonymous_landing(&self) -> bool {
        self.page == Page::Landing && self.session.is_none()
    }

    fn value(&self, input: Input) -> &str {
        self.inputs.get(&input).map(String::as_str).unwrap_or("")
    }

    /// Browser-side `required` / `type="email"` checks
    fn native_valid(&self, inputs: &[Input]) -> bool {
        inputs.iter().all(|i| !self.value(*i).is_empty())
            && inputs
                .iter()
                .filter(|i| matches!(i, Input::RegEmail | Input::LoginEmail))
                .all(|i| self.value(*i).contains('@'))
    }

    fn feedback(&mut self, message: &str, redirect: &str) {
        if self.behavior.alerts {
            self.alert = Some(self.behavior.dialog_text.unwrap_or(message).to_string());
        } else {
            self.land(redirect);
        }
    }

    fn register(&mut self) {
        if !self.native_valid(&[Input::RegName, Input::RegEmail, Input::RegPassword]) {
            return;
        }
        let email = self.value(Input::RegEmail).to_string();
        let user = User {
            name: self.value(Input::RegName).to_string(),
            password: self.value(Input::RegPassword).to_string(),
        };
        self.inputs.clear();

        if self.users.contains_key(&email) {
            self.feedback("Email already registered", "index.php?error=exists");
            return;
        }
        self.users.insert(email.clone(), user);
        self.registrations.push(email);
        self.feedback("Registration successful! Please login.", "index.php");
    }

    fn login(&mut self) {
        if !self.native_valid(&[Input::LoginEmail, Input::LoginPassword]) {
            return;
        }
        let email = self.value(Input::LoginEmail).to_string();
        let password = self.value(Input::LoginPassword).to_string();
        let rejects = self.behavior.login_rejects;
        self.inputs.clear();

        match self.users.get(&email) {
            None => self.feedback("User not found", "index.php?error=notfound"),
            Some(user) if rejects || user.password != password => {
                self.feedback("Invalid password", "index.php?error=password")
            }
            Some(_) => {
                self.session = Some(email);
                self.page = Page::Enroll;
                self.url = format!("{}enroll.php", BASE);
            }
        }
    }

    fn welcome(&self) -> String {
        let name = self
            .session
            .as_ref()
            .and_then(|e| self.users.get(e))
            .map(|u| u.name.as_str())
            .unwrap_or("student");
        format!("Welcome, {}", name)
    }

    fn elements(&self, locator: &Locator) -> Vec<Kind> {
        if self.behavior.no_container {
            if let Locator::ClassName(c) = locator {
                if c == "container" {
                    return vec![];
                }
            }
        }
        if self.anonymous_landing() {
            return self.landing_elements(locator);
        }

        let mut found = match locator {
            Locator::XPath(p) if p == LOGOUT_BUTTON => vec![Kind::LogoutButton],
            Locator::XPath(p) if p == WELCOME_TEXT && !self.behavior.no_welcome => {
                vec![Kind::Welcome]
            }
            Locator::ClassName(c) if c == "container" => vec![Kind::Container],
            Locator::ClassName(c) if c == "btn" => vec![Kind::LogoutButton],
            _ => self.asset_elements(locator),
        };
        if self.page == Page::Landing {
            if let Locator::Tag(t) = locator {
                if t == "h2" {
                    found.push(Kind::Heading);
                }
            }
        }
        found
    }

    fn landing_elements(&self, locator: &Locator) -> Vec<Kind> {
        use Input::*;
        let all_inputs = || -> Vec<Kind> {
            [RegName, RegEmail, RegPassword, LoginEmail, LoginPassword]
                .into_iter()
                .map(Kind::Field)
                .collect()
        };

        match locator {
            Locator::Tag(t) if t == "h2" => vec![Kind::Heading],
            Locator::Tag(t) if t == "input" => all_inputs(),
            Locator::Name(n) => match n.as_str() {
                "name" => vec![Kind::Field(RegName)],
                "email" => vec![Kind::Field(RegEmail), Kind::Field(LoginEmail)],
                "password" => vec![Kind::Field(RegPassword), Kind::Field(LoginPassword)],
                _ => vec![],
            },
            Locator::XPath(p) => match p.as_str() {
                REGISTER_FORM | LOGIN_FORM => vec![Kind::Form],
                REGISTER_SUBMIT => vec![Kind::RegisterSubmit],
                REGISTER_PASSWORD => vec![Kind::Field(RegPassword)],
                LOGIN_EMAIL => vec![Kind::Field(LoginEmail)],
                LOGIN_PASSWORD => vec![Kind::Field(LoginPassword)],
                LOGIN_SUBMIT => vec![Kind::LoginSubmit],
                _ => vec![],
            },
            Locator::ClassName(c) => match c.as_str() {
                "container" => vec![Kind::Container],
                "form-control" => all_inputs(),
                "btn" => vec![Kind::RegisterSubmit, Kind::LoginSubmit],
                _ => vec![],
            },
            _ => self.asset_elements(locator),
        }
    }

    fn asset_elements(&self, locator: &Locator) -> Vec<Kind> {
        match locator {
            Locator::Tag(t) if t == "link" => vec![Kind::Stylesheet],
            Locator::Tag(t) if t == "script" => vec![Kind::Script],
            _ => vec![],
        }
    }

    fn markup(&self) -> String {
        let head = format!(
            "<head><title>{}</title><link rel=\"stylesheet\" href=\"{}\"></head>",
            self.title(),
            BOOTSTRAP_CSS
        );
        let body = if self.anonymous_landing() {
            format!(
                "<div class=\"container\"><h2>{}</h2>\
                 <form action=\"register.php\" method=\"post\"><h3>Register</h3>\
                 <input class=\"form-control\" name=\"name\" required>\
                 <input class=\"form-control\" type=\"email\" name=\"email\" required>\
                 <input class=\"form-control\" type=\"password\" name=\"password\" required>\
                 <button type=\"submit\" class=\"btn\">Sign up</button></form>\
                 <form action=\"login.php\" method=\"post\"><h3>Login</h3>\
                 <input class=\"form-control\" type=\"email\" name=\"email\" required>\
                 <input class=\"form-control\" type=\"password\" name=\"password\" required>\
                 <button type=\"submit\" class=\"btn\">Sign in</button></form></div>",
                TITLE
            )
        } else {
            format!(
                "<div class=\"container\"><h1>{}</h1><p>Choose your courses</p>\
                 <form action=\"logout.php\"><button class=\"btn\">Logout</button></form></div>",
                self.welcome()
            )
        };
        format!(
            "<html>{}<body>{}<script src=\"{}\"></script></body></html>",
            head, body, BOOTSTRAP_JS
        )
    }

    fn title(&self) -> &'static str {
        match self.page {
            Page::Landing => TITLE,
            Page::Enroll => "Course Enrollment",
        }
    }
}

/// Shared handle; clone it before boxing to inspect the site afterwards
#[derive(Clone)]
pub struct FakeSite {
    state: Arc<Mutex<SiteState>>,
}

impl FakeSite {
    pub fn new(behavior: Behavior) -> Self {
        Self {
            state: Arc::new(Mutex::new(SiteState {
                behavior,
                url: "about:blank".to_string(),
                page: Page::Landing,
                session: None,
                users: HashMap::new(),
                registrations: Vec::new(),
                alert: None,
                inputs: HashMap::new(),
                quit: false,
            })),
        }
    }

    /// Start with an authenticated session for an existing account
    pub fn logged_in(self, email: &str) -> Self {
        {
            let mut state = self.lock();
            state.users.insert(
                email.to_string(),
                User {
                    name: "Leftover User".to_string(),
                    password: "leftover".to_string(),
                },
            );
            state.session = Some(email.to_string());
        }
        self
    }

    fn lock(&self) -> MutexGuard<'_, SiteState> {
        self.state.lock().unwrap()
    }

    pub fn registrations(&self) -> Vec<String> {
        self.lock().registrations.clone()
    }

    pub fn is_quit(&self) -> bool {
        self.lock().quit
    }

    pub fn is_logged_in(&self) -> bool {
        self.lock().session.is_some()
    }
}

struct FakeElement {
    state: Arc<Mutex<SiteState>>,
    kind: Kind,
}

#[async_trait]
impl PageElement for FakeElement {
    async fn is_displayed(&self) -> E2eResult<bool> {
        Ok(true)
    }

    async fn text(&self) -> E2eResult<String> {
        let state = self.state.lock().unwrap();
        Ok(match self.kind {
            Kind::Heading if state.behavior.wrong_heading => "Student Portal".to_string(),
            Kind::Heading => TITLE.to_string(),
            Kind::Welcome => state.welcome(),
            Kind::RegisterSubmit => "Sign up".to_string(),
            Kind::LoginSubmit => "Sign in".to_string(),
            Kind::LogoutButton => "Logout".to_string(),
            _ => String::new(),
        })
    }

    async fn attr(&self, name: &str) -> E2eResult<Option<String>> {
        let behavior = self.state.lock().unwrap().behavior;
        let value = match (self.kind, name) {
            (Kind::Field(_), "required") if behavior.missing_required => None,
            (Kind::Field(_), "required") => Some("true"),
            (Kind::Field(Input::RegName), "type") => Some("text"),
            (Kind::Field(Input::RegEmail | Input::LoginEmail), "type") if behavior.plain_email_type => {
                Some("text")
            }
            (Kind::Field(Input::RegEmail | Input::LoginEmail), "type") => Some("email"),
            (Kind::Field(Input::RegPassword | Input::LoginPassword), "type")
                if behavior.unmasked_password =>
            {
                Some("text")
            }
            (Kind::Field(Input::RegPassword | Input::LoginPassword), "type") => Some("password"),
            (Kind::RegisterSubmit | Kind::LoginSubmit, "type") => Some("submit"),
            (Kind::Stylesheet, "href") if behavior.no_bootstrap_css => Some(PLAIN_CSS),
            (Kind::Stylesheet, "href") => Some(BOOTSTRAP_CSS),
            (Kind::Script, "src") if behavior.no_bootstrap_js => Some(PLAIN_JS),
            (Kind::Script, "src") => Some(BOOTSTRAP_JS),
            _ => None,
        };
        Ok(value.map(String::from))
    }

    async fn send_keys(&self, text: &str) -> E2eResult<()> {
        if let Kind::Field(input) = self.kind {
            self.state
                .lock()
                .unwrap()
                .inputs
                .entry(input)
                .or_default()
                .push_str(text);
        }
        Ok(())
    }

    async fn click(&self) -> E2eResult<()> {
        let mut state = self.state.lock().unwrap();
        match self.kind {
            Kind::RegisterSubmit => state.register(),
            Kind::LoginSubmit => state.login(),
            Kind::LogoutButton => {
                state.session = None;
                state.land("index.php");
            }
            _ => {}
        }
        Ok(())
    }
}

#[async_trait]
impl Session for FakeSite {
    async fn goto(&self, url: &str) -> E2eResult<()> {
        let path = url.strip_prefix(BASE).unwrap_or(url).to_string();
        self.lock().goto_path(&path);
        Ok(())
    }

    async fn title(&self) -> E2eResult<String> {
        Ok(self.lock().title().to_string())
    }

    async fn current_url(&self) -> E2eResult<String> {
        Ok(self.lock().url.clone())
    }

    async fn page_source(&self) -> E2eResult<String> {
        Ok(self.lock().markup())
    }

    async fn find_all(&self, locator: &Locator) -> E2eResult<Vec<Box<dyn PageElement>>> {
        let kinds = self.lock().elements(locator);
        Ok(kinds
            .into_iter()
            .map(|kind| {
                Box::new(FakeElement {
                    state: Arc::clone(&self.state),
                    kind,
                }) as Box<dyn PageElement>
            })
            .collect())
    }

    async fn alert_text(&self) -> E2eResult<Option<String>> {
        Ok(self.lock().alert.clone())
    }

    async fn accept_alert(&self) -> E2eResult<()> {
        self.lock().alert = None;
        Ok(())
    }

    async fn quit(&self) -> E2eResult<()> {
        self.lock().quit = true;
        Ok(())
    }
}
