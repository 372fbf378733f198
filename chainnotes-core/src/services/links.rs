//! Authorization links - the GetLogin companion app flow
//!
//! The user installs GetLogin, opens the authorize link, and GetLogin hands
//! back a session private key and the username through a return link whose
//! query carries `privateKey` and `username`.

use url::Url;

use crate::domain::result::{Error, Result};
use crate::domain::Credentials;

pub const GETLOGIN_IOS_URL: &str = "https://apps.apple.com/tr/app/facebook/id6444726873";
pub const GETLOGIN_ANDROID_URL: &str =
    "https://play.google.com/store/apps/details?id=com.shadurin.getloginmobile";
pub const GETLOGIN_AUTHORIZE_URL: &str = "getlogin://dapp-authorize?applicationId=3";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Ios,
    Android,
    Other,
}

impl Platform {
    /// Platform this binary was built for
    pub fn current() -> Self {
        if cfg!(target_os = "ios") {
            Platform::Ios
        } else if cfg!(target_os = "android") {
            Platform::Android
        } else {
            Platform::Other
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "ios" => Some(Platform::Ios),
            "android" => Some(Platform::Android),
            "other" | "desktop" => Some(Platform::Other),
            _ => None,
        }
    }
}

/// Store page of the GetLogin app
///
/// Anything that is not iOS gets the Play Store link.
pub fn install_url(platform: Platform) -> &'static str {
    match platform {
        Platform::Ios => GETLOGIN_IOS_URL,
        Platform::Android | Platform::Other => GETLOGIN_ANDROID_URL,
    }
}

pub fn authorize_url() -> &'static str {
    GETLOGIN_AUTHORIZE_URL
}

/// Read the credentials GetLogin returns in a callback link
pub fn parse_callback(link: &str) -> Result<Credentials> {
    let url = Url::parse(link.trim())
        .map_err(|e| Error::MissingCredentials(format!("invalid callback link: {}", e)))?;

    let mut private_key = String::new();
    let mut username = String::new();
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "privateKey" => private_key = value.into_owned(),
            "username" => username = value.into_owned(),
            _ => {}
        }
    }

    let credentials = Credentials::new(private_key, username);
    if !credentials.is_complete() {
        return Err(Error::MissingCredentials(
            "callback link must carry privateKey and username".to_string(),
        ));
    }
    Ok(credentials)
}
