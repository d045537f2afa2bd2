use std::collections::HashMap;

pub(crate) mod filters {
    #[askama::filter_fn]
    pub fn t(value: &str, values: &dyn askama::Values) -> askama::Result<String> {
        let lang = askama::get_value::<String>(values, "lang")?;

        Ok(rust_i18n::t!(value, locale = lang).to_string())
    }
}

/// Renders email templates with the recipient's language in scope.
pub(crate) struct Template {
    lang: String,
}

impl Template {
    pub fn new(lang: impl Into<String>) -> Self {
        Self { lang: lang.into() }
    }

    pub fn lang(&self) -> &str {
        &self.lang
    }

    pub fn render<T: askama::Template>(&self, template: T) -> Result<String, askama::Error> {
        let mut values: HashMap<&str, Box<dyn std::any::Any>> = HashMap::new();
        values.insert("lang", Box::new(self.lang.to_owned()));

        template.render_with_values(&values)
    }
}
