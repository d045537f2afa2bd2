use std::borrow::Cow;

use axum_extra::extract::{
    CookieJar,
    cookie::{Cookie, SameSite},
};
use smartmenu_menu::MenuPreferences;

pub const PREFERENCES_COOKIE: &str = "smartmenu_prefs";

/// Preferences of the last successful menu request, or the defaults.
pub fn read_preferences(jar: &CookieJar) -> MenuPreferences {
    let Some(cookie) = jar.get(PREFERENCES_COOKIE) else {
        return MenuPreferences::default();
    };

    let raw = cookie.value();
    let decoded = urlencoding::decode(raw).unwrap_or(Cow::Borrowed(raw));

    MenuPreferences::from_json_lenient(&decoded)
}

pub fn preferences_cookie(preferences: &MenuPreferences) -> Cookie<'static> {
    let value = urlencoding::encode(&preferences.to_json()).into_owned();

    Cookie::build((PREFERENCES_COOKIE, value))
        .path("/")
        .max_age(time::Duration::days(365))
        .same_site(SameSite::Lax)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use smartmenu_menu::DietaryPreference;

    #[test]
    fn saved_preferences_are_read_back() {
        let preferences = MenuPreferences {
            days: 3,
            people: 2,
            dietary: DietaryPreference::Vegetarian,
            gluten_free: true,
            lactose_free: false,
        };

        let jar = CookieJar::new().add(preferences_cookie(&preferences));

        assert_eq!(read_preferences(&jar), preferences);
    }

    #[test]
    fn missing_or_corrupt_cookie_gives_defaults() {
        assert_eq!(read_preferences(&CookieJar::new()), MenuPreferences::default());

        let jar = CookieJar::new().add(Cookie::new(PREFERENCES_COOKIE, "%7Bnope"));
        assert_eq!(read_preferences(&jar), MenuPreferences::default());
    }
}
