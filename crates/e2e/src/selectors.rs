//! Locators for the Student Management System pages

use crate::session::Locator;

pub const REGISTER_FORM: &str = "//form[@action='register.php']";
pub const REGISTER_SUBMIT: &str = "//form[@action='register.php']//button[@type='submit']";
pub const REGISTER_PASSWORD: &str = "//form[@action='register.php']//input[@name='password']";

pub const LOGIN_FORM: &str = "//form[@action='login.php']";
pub const LOGIN_EMAIL: &str = "//form[@action='login.php']//input[@name='email']";
pub const LOGIN_PASSWORD: &str = "//form[@action='login.php']//input[@name='password']";
pub const LOGIN_SUBMIT: &str = "//form[@action='login.php']//button[@type='submit']";

pub const LOGOUT_BUTTON: &str = "//form[@action='logout.php']//button";

pub const WELCOME_TEXT: &str = "//*[contains(text(), 'Welcome')]";

/// Register form fields, located by `name`. The register form precedes the
/// login form, so the first match is the register field.
pub fn field(name: &str) -> Locator {
    Locator::name(name)
}

pub fn xpath(path: &str) -> Locator {
    Locator::xpath(path)
}
