//! The ordered case catalog
//!
//! Cases run in ascending number order and lean on the session state their
//! predecessors leave behind (registration before login, login before
//! logout). Nothing enforces that beyond [`CATALOG`] being sorted.

use tracing::warn;

use crate::context::TestContext;
use crate::error::{ensure, E2eError, E2eResult};
use crate::identity::GeneratedIdentity;
use crate::outcome::{CaseVerdict, SubmissionOutcome};
use crate::selectors::{
    field, xpath, LOGIN_EMAIL, LOGIN_FORM, LOGIN_PASSWORD, LOGIN_SUBMIT, LOGOUT_BUTTON,
    REGISTER_FORM, REGISTER_PASSWORD, REGISTER_SUBMIT, WELCOME_TEXT,
};
use crate::session::{Locator, PageElement};

/// Title and heading of the landing page
pub const APP_TITLE: &str = "Student Management System";

/// Front-end framework the landing page must load
pub const FRAMEWORK: &str = "bootstrap";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Case {
    PageLoads = 1,
    RegistrationFormPresent = 2,
    LoginFormPresent = 3,
    SuccessfulRegistration = 4,
    InvalidEmailRegistration = 5,
    EmptyRegistration = 6,
    NonexistentUserLogin = 7,
    RegisterThenLogin = 8,
    Logout = 9,
    EnrollWithoutLogin = 10,
    PasswordFieldsMasked = 11,
    FormValidationAttributes = 12,
    ResponsiveLayout = 13,
    FrameworkAssets = 14,
}

/// Every case, in execution order
pub const CATALOG: [Case; 14] = [
    Case::PageLoads,
    Case::RegistrationFormPresent,
    Case::LoginFormPresent,
    Case::SuccessfulRegistration,
    Case::InvalidEmailRegistration,
    Case::EmptyRegistration,
    Case::NonexistentUserLogin,
    Case::RegisterThenLogin,
    Case::Logout,
    Case::EnrollWithoutLogin,
    Case::PasswordFieldsMasked,
    Case::FormValidationAttributes,
    Case::ResponsiveLayout,
    Case::FrameworkAssets,
];

impl Case {
    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn from_number(number: u8) -> Option<Self> {
        CATALOG.iter().copied().find(|c| c.number() == number)
    }

    pub fn name(self) -> &'static str {
        match self {
            Case::PageLoads => "page_loads_successfully",
            Case::RegistrationFormPresent => "registration_form_elements_present",
            Case::LoginFormPresent => "login_form_elements_present",
            Case::SuccessfulRegistration => "successful_user_registration",
            Case::InvalidEmailRegistration => "registration_with_invalid_email",
            Case::EmptyRegistration => "empty_registration_fields",
            Case::NonexistentUserLogin => "login_with_nonexistent_user",
            Case::RegisterThenLogin => "complete_user_journey_registration_and_login",
            Case::Logout => "logout_functionality",
            Case::EnrollWithoutLogin => "enrollment_page_access_without_login",
            Case::PasswordFieldsMasked => "password_field_security",
            Case::FormValidationAttributes => "form_input_validation",
            Case::ResponsiveLayout => "responsive_design_elements",
            Case::FrameworkAssets => "page_navigation_and_links",
        }
    }

    /// `test_04_successful_user_registration`
    pub fn label(self) -> String {
        format!("test_{:02}_{}", self.number(), self.name())
    }

    /// Run the case body. Expects [`TestContext::preamble`] to have run.
    pub async fn run(self, ctx: &mut TestContext) -> E2eResult<CaseVerdict> {
        match self {
            Case::PageLoads => page_loads(ctx).await,
            Case::RegistrationFormPresent => registration_form_present(ctx).await,
            Case::LoginFormPresent => login_form_present(ctx).await,
            Case::SuccessfulRegistration => successful_registration(ctx).await,
            Case::InvalidEmailRegistration => invalid_email_registration(ctx).await,
            Case::EmptyRegistration => empty_registration(ctx).await,
            Case::NonexistentUserLogin => nonexistent_user_login(ctx).await,
            Case::RegisterThenLogin => register_then_login(ctx).await,
            Case::Logout => logout(ctx).await,
            Case::EnrollWithoutLogin => enroll_without_login(ctx).await,
            Case::PasswordFieldsMasked => password_fields_masked(ctx).await,
            Case::FormValidationAttributes => form_validation_attributes(ctx).await,
            Case::ResponsiveLayout => responsive_layout(ctx).await,
            Case::FrameworkAssets => framework_assets(ctx).await,
        }
    }
}

/// Register form inputs (name, email, password); `None` if any is missing.
async fn registration_fields(
    ctx: &TestContext,
) -> E2eResult<Option<[Box<dyn PageElement>; 3]>> {
    let Some(name) = ctx.find_optional(&field("name")).await? else {
        return Ok(None);
    };
    let Some(email) = ctx.find_optional(&field("email")).await? else {
        return Ok(None);
    };
    let Some(password) = ctx.find_optional(&field("password")).await? else {
        return Ok(None);
    };
    Ok(Some([name, email, password]))
}

async fn fill_registration(
    fields: &[Box<dyn PageElement>; 3],
    identity: &GeneratedIdentity,
) -> E2eResult<()> {
    let [name, email, password] = fields;
    name.send_keys(&identity.name).await?;
    email.send_keys(&identity.email).await?;
    password.send_keys(&identity.password).await
}

async fn required_registration_fields(ctx: &TestContext) -> E2eResult<[Box<dyn PageElement>; 3]> {
    registration_fields(ctx)
        .await?
        .ok_or_else(|| E2eError::ElementNotFound("registration form fields".to_string()))
}

async fn fill_login(ctx: &TestContext, email: &str, password: &str) -> E2eResult<()> {
    ctx.fill(&xpath(LOGIN_EMAIL), email).await?;
    ctx.fill(&xpath(LOGIN_PASSWORD), password).await
}

/// Whether the page still looks like the anonymous landing page
fn looks_like_landing(url: &str, markup: &str, markers: &[&str]) -> bool {
    url.ends_with('/') || url.contains("index.php") || markers.iter().any(|m| markup.contains(m))
}

async fn all_displayed(ctx: &TestContext, locators: &[Locator]) -> E2eResult<()> {
    for locator in locators {
        let shown = ctx.is_displayed(locator).await?;
        ensure(shown, || format!("{} is not displayed", locator))?;
    }
    Ok(())
}

async fn page_loads(ctx: &mut TestContext) -> E2eResult<CaseVerdict> {
    ctx.session().goto(ctx.base_url()).await?;

    let title = ctx.session().title().await?;
    ensure(title.contains(APP_TITLE), || {
        format!("title {:?} does not contain {:?}", title, APP_TITLE)
    })?;

    let heading = ctx.find(&Locator::tag("h2")).await?.text().await?;
    ensure(heading == APP_TITLE, || {
        format!("heading {:?} != {:?}", heading, APP_TITLE)
    })?;

    Ok(CaseVerdict::passed("Page loads successfully"))
}

async fn registration_form_present(ctx: &mut TestContext) -> E2eResult<CaseVerdict> {
    all_displayed(
        ctx,
        &[
            xpath(REGISTER_FORM),
            field("name"),
            field("email"),
            field("password"),
            xpath(REGISTER_SUBMIT),
        ],
    )
    .await?;
    Ok(CaseVerdict::passed("Registration form elements are present"))
}

async fn login_form_present(ctx: &mut TestContext) -> E2eResult<CaseVerdict> {
    all_displayed(
        ctx,
        &[
            xpath(LOGIN_FORM),
            xpath(LOGIN_EMAIL),
            xpath(LOGIN_PASSWORD),
            xpath(LOGIN_SUBMIT),
        ],
    )
    .await?;
    Ok(CaseVerdict::passed("Login form elements are present"))
}

async fn successful_registration(ctx: &mut TestContext) -> E2eResult<CaseVerdict> {
    let identity = ctx.identity("Test User Registration", "testpass123");

    let fields = required_registration_fields(ctx).await?;
    fill_registration(&fields, &identity).await?;

    let submit = ctx.find(&xpath(REGISTER_SUBMIT)).await?;
    match ctx.submit(submit.as_ref(), ctx.timing().dialog_wait).await? {
        SubmissionOutcome::Dialog(text) => {
            ensure(text.contains("Registration successful"), || {
                format!("unexpected registration dialog: {:?}", text)
            })?;
            Ok(CaseVerdict::passed("User registration successful"))
        }
        SubmissionOutcome::Redirect(url) | SubmissionOutcome::Content(url) => {
            ensure(url.contains("index.php"), || {
                format!("no dialog and {} is not index.php", url)
            })?;
            Ok(CaseVerdict::passed("User registration successful (no alert)"))
        }
    }
}

async fn invalid_email_registration(ctx: &mut TestContext) -> E2eResult<CaseVerdict> {
    const SKIP: &str = "User already logged in, registration form not available";

    let Some(fields) = registration_fields(ctx).await? else {
        return Ok(CaseVerdict::skipped(SKIP));
    };
    let bogus = GeneratedIdentity {
        name: "Test User".to_string(),
        email: "invalid-email-format".to_string(),
        password: "testpass123".to_string(),
    };
    fill_registration(&fields, &bogus).await?;

    let Some(submit) = ctx.find_optional(&xpath(REGISTER_SUBMIT)).await? else {
        return Ok(CaseVerdict::skipped(SKIP));
    };
    submit.click().await?;
    ctx.settle(ctx.timing().submit_settle).await;

    // Native validation may block the submit or the server may accept it;
    // either way the visitor must stay on the landing page.
    let url = ctx.current_url().await?;
    let markup = ctx.page_source().await?;
    ensure(looks_like_landing(&url, &markup, &[APP_TITLE]), || {
        format!("left the landing page after invalid email: {}", url)
    })?;
    Ok(CaseVerdict::passed("Invalid email format handled correctly"))
}

async fn empty_registration(ctx: &mut TestContext) -> E2eResult<CaseVerdict> {
    let Some(submit) = ctx.find_optional(&xpath(REGISTER_SUBMIT)).await? else {
        return Ok(CaseVerdict::skipped(
            "User already logged in, registration form not available",
        ));
    };
    submit.click().await?;
    ctx.settle(ctx.timing().submit_settle).await;

    let url = ctx.current_url().await?;
    let markup = ctx.page_source().await?;
    ensure(looks_like_landing(&url, &markup, &[APP_TITLE, "Register"]), || {
        format!("left the landing page after empty submit: {}", url)
    })?;
    Ok(CaseVerdict::passed("Empty registration fields validation works"))
}

async fn nonexistent_user_login(ctx: &mut TestContext) -> E2eResult<CaseVerdict> {
    fill_login(ctx, "nonexistent@example.com", "wrongpassword").await?;

    let submit = ctx.find(&xpath(LOGIN_SUBMIT)).await?;
    let outcome = ctx.submit(submit.as_ref(), ctx.timing().dialog_wait).await?;
    match outcome.dialog_text() {
        Some(text) => {
            ensure(text.contains("User not found"), || {
                format!("unexpected login dialog: {:?}", text)
            })?;
            Ok(CaseVerdict::passed("Non-existent user login handled correctly"))
        }
        None => {
            // Accepted without evidence the login was actually rejected.
            warn!(
                "No dialog after unknown-user login; rejection not verified (url: {})",
                ctx.current_url().await?
            );
            Ok(CaseVerdict::passed("Login validation works (no alert shown)"))
        }
    }
}

async fn register_then_login(ctx: &mut TestContext) -> E2eResult<CaseVerdict> {
    let identity = ctx.identity("Journey Test User", "journey123");
    let short = ctx.timing().short_dialog_wait;

    let fields = required_registration_fields(ctx).await?;
    fill_registration(&fields, &identity).await?;
    let submit = ctx.find(&xpath(REGISTER_SUBMIT)).await?;
    ctx.submit(submit.as_ref(), short).await?;

    ctx.settle(ctx.timing().submit_settle).await;
    ctx.session().goto(ctx.base_url()).await?;

    fill_login(ctx, &identity.email, &identity.password).await?;
    let submit = ctx.find(&xpath(LOGIN_SUBMIT)).await?;
    ctx.submit(submit.as_ref(), short).await?;

    ctx.settle(ctx.timing().login_settle).await;
    let url = ctx.current_url().await?;
    let markup = ctx.page_source().await?;
    ensure(url.contains("enroll.php") || markup.contains("Welcome"), || {
        format!("not logged in after registration: {}", url)
    })?;
    Ok(CaseVerdict::passed("Complete user journey successful"))
}

async fn logout(ctx: &mut TestContext) -> E2eResult<CaseVerdict> {
    let identity = ctx.identity("Logout Test User", "logout123");
    let short = ctx.timing().short_dialog_wait;

    let Some(fields) = registration_fields(ctx).await? else {
        return Ok(CaseVerdict::skipped(
            "Registration form not available, user might be logged in",
        ));
    };
    fill_registration(&fields, &identity).await?;
    let Some(submit) = ctx.find_optional(&xpath(REGISTER_SUBMIT)).await? else {
        return Ok(CaseVerdict::skipped(
            "Registration form not available, user might be logged in",
        ));
    };
    ctx.submit(submit.as_ref(), short).await?;

    ctx.settle(ctx.timing().submit_settle).await;
    ctx.session().goto(ctx.base_url()).await?;

    // The session may already be authenticated; log in only if offered.
    let email = ctx.find_optional(&xpath(LOGIN_EMAIL)).await?;
    let password = ctx.find_optional(&xpath(LOGIN_PASSWORD)).await?;
    let submit = ctx.find_optional(&xpath(LOGIN_SUBMIT)).await?;
    if let (Some(email), Some(password), Some(submit)) = (email, password, submit) {
        email.send_keys(&identity.email).await?;
        password.send_keys(&identity.password).await?;
        ctx.submit(submit.as_ref(), short).await?;
        ctx.settle(ctx.timing().login_settle).await;
    }

    let Some(button) = ctx.find_optional(&xpath(LOGOUT_BUTTON)).await? else {
        return Ok(CaseVerdict::skipped(
            "User not logged in or logout button not found",
        ));
    };
    button.click().await?;
    ctx.settle(ctx.timing().submit_settle).await;

    let markup = ctx.page_source().await?;
    ensure(
        ["Register", "Login", APP_TITLE]
            .iter()
            .any(|m| markup.contains(m)),
        || "logout did not return to the landing page".to_string(),
    )?;
    Ok(CaseVerdict::passed("Logout functionality works"))
}

async fn enroll_without_login(ctx: &mut TestContext) -> E2eResult<CaseVerdict> {
    ctx.session().goto(&ctx.url("logout.php")).await?;
    ctx.settle(ctx.timing().logout_settle).await;

    ctx.session().goto(&ctx.url("enroll.php")).await?;
    ctx.settle(ctx.timing().page_settle).await;

    let url = ctx.current_url().await?;
    let markup = ctx.page_source().await?;
    ensure(
        looks_like_landing(&url, &markup, &["Register", "Login", APP_TITLE]),
        || format!("enroll.php served without a session: {}", url),
    )?;
    Ok(CaseVerdict::passed(
        "Enrollment page properly protected from unauthorized access",
    ))
}

async fn password_fields_masked(ctx: &mut TestContext) -> E2eResult<CaseVerdict> {
    const SKIP: &str = "User already logged in, password fields not visible";

    for path in [REGISTER_PASSWORD, LOGIN_PASSWORD] {
        let Some(input) = ctx.find_optional(&xpath(path)).await? else {
            return Ok(CaseVerdict::skipped(SKIP));
        };
        let kind = input.attr("type").await?;
        ensure(kind.as_deref() == Some("password"), || {
            format!("{} has type {:?}", path, kind)
        })?;
    }
    Ok(CaseVerdict::passed("Password fields are properly secured"))
}

async fn form_validation_attributes(ctx: &mut TestContext) -> E2eResult<CaseVerdict> {
    let Some(fields) = registration_fields(ctx).await? else {
        return Ok(CaseVerdict::skipped(
            "User already logged in, form fields not visible",
        ));
    };

    for (label, input) in ["name", "email", "password"].iter().zip(fields.iter()) {
        let required = input.attr("required").await?;
        ensure(required.is_some(), || format!("{} is not required", label))?;
    }

    let kind = fields[1].attr("type").await?;
    ensure(kind.as_deref() == Some("email"), || {
        format!("email field has type {:?}", kind)
    })?;
    Ok(CaseVerdict::passed("Form validation attributes are correct"))
}

async fn responsive_layout(ctx: &mut TestContext) -> E2eResult<CaseVerdict> {
    let container = ctx
        .find_optional(&Locator::class("container"))
        .await?
        .ok_or_else(|| E2eError::AssertionFailed("Container element not found".to_string()))?;
    ensure(container.is_displayed().await?, || {
        "container is not displayed".to_string()
    })?;

    let controls = ctx.find_all(&Locator::class("form-control")).await?.len();
    let inputs = if controls == 0 {
        ctx.find_all(&Locator::tag("input")).await?.len()
    } else {
        controls
    };
    if inputs == 0 {
        // Authenticated pages use a different layout without forms.
        let welcome = ctx.find_all(&xpath(WELCOME_TEXT)).await?;
        ensure(!welcome.is_empty(), || {
            "No form controls or welcome message found".to_string()
        })?;
        return Ok(CaseVerdict::passed(
            "User is logged in, different page structure",
        ));
    }

    let buttons = ctx.find_all(&Locator::class("btn")).await?.len();
    ensure(buttons > 0, || "no .btn elements".to_string())?;
    Ok(CaseVerdict::passed("Responsive design elements are present"))
}

/// Whether any element's `attr` references the framework
async fn references_framework(elements: &[Box<dyn PageElement>], attr: &str) -> E2eResult<bool> {
    for element in elements {
        if let Some(value) = element.attr(attr).await? {
            if value.contains(FRAMEWORK) {
                return Ok(true);
            }
        }
    }
    Ok(false)
}

async fn framework_assets(ctx: &mut TestContext) -> E2eResult<CaseVerdict> {
    let links = ctx.find_all(&Locator::tag("link")).await?;
    ensure(references_framework(&links, "href").await?, || {
        "Bootstrap CSS should be loaded".to_string()
    })?;

    let scripts = ctx.find_all(&Locator::tag("script")).await?;
    ensure(references_framework(&scripts, "src").await?, || {
        "Bootstrap JS should be loaded".to_string()
    })?;
    Ok(CaseVerdict::passed(
        "Page navigation and external resources work correctly",
    ))
}
