use std::sync::Arc;

use smartmenu_menu::{NutritionalReport, SelectionMap, ShoppingList};
use time::OffsetDateTime;

use crate::{
    DeliveryReport, Email, Mailer, is_valid_address,
    message::{
        MenuHtmlTemplate, MenuPlainTemplate, NutritionHtmlTemplate, NutritionPlainTemplate,
        ShoppingListHtmlTemplate, ShoppingListPlainTemplate, menu_dishes, nutrition_rows,
    },
    template::Template,
};

#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("enter a valid email address")]
    InvalidAddress,

    #[error("there is nothing to send yet")]
    NothingToSend,

    #[error("failed to render email: {0}")]
    Render(#[from] askama::Error),
}

impl From<NotificationError> for smartmenu_shared::Error {
    fn from(value: NotificationError) -> Self {
        match value {
            NotificationError::Render(err) => smartmenu_shared::Error::Server(err.to_string()),
            other => smartmenu_shared::Error::Invalid(other.to_string()),
        }
    }
}

/// Renders the three outgoing emails and hands them to a [`Mailer`].
///
/// The recipient is checked before rendering; a rejected address never
/// reaches the mailer. Nothing passed in is modified.
#[derive(Clone, Debug)]
pub struct Notifier {
    mailer: Arc<dyn Mailer>,
}

impl Notifier {
    pub fn new(mailer: Arc<dyn Mailer>) -> Self {
        Self { mailer }
    }

    pub fn provider_name(&self) -> &'static str {
        self.mailer.provider_name()
    }

    #[tracing::instrument(skip_all, fields(dishes = selections.len()))]
    pub async fn send_menu(
        &self,
        to: &str,
        lang: &str,
        selections: &SelectionMap,
    ) -> Result<DeliveryReport, NotificationError> {
        let to = recipient(to)?;
        if selections.is_empty() {
            return Err(NotificationError::NothingToSend);
        }

        let template = Template::new(lang);
        let dishes = menu_dishes(selections, lang);
        let year = year();

        let html = template.render(MenuHtmlTemplate {
            lang,
            year,
            dishes: &dishes,
        })?;
        let plain = template.render(MenuPlainTemplate {
            lang,
            year,
            dishes: &dishes,
        })?;

        Ok(self
            .dispatch(&template, to, "Your selected menu", html, plain)
            .await)
    }

    #[tracing::instrument(skip_all, fields(items = list.len()))]
    pub async fn send_shopping_list(
        &self,
        to: &str,
        lang: &str,
        list: &ShoppingList,
    ) -> Result<DeliveryReport, NotificationError> {
        let to = recipient(to)?;
        if list.is_empty() {
            return Err(NotificationError::NothingToSend);
        }

        let template = Template::new(lang);
        let year = year();

        let html = template.render(ShoppingListHtmlTemplate {
            lang,
            year,
            items: list,
        })?;
        let plain = template.render(ShoppingListPlainTemplate {
            lang,
            year,
            items: list,
        })?;

        Ok(self
            .dispatch(&template, to, "Your shopping list", html, plain)
            .await)
    }

    #[tracing::instrument(skip_all, fields(recipes = report.len()))]
    pub async fn send_nutrition(
        &self,
        to: &str,
        lang: &str,
        report: &NutritionalReport,
    ) -> Result<DeliveryReport, NotificationError> {
        let to = recipient(to)?;
        if report.is_empty() {
            return Err(NotificationError::NothingToSend);
        }

        let template = Template::new(lang);
        let rows = nutrition_rows(report);
        let year = year();

        let html = template.render(NutritionHtmlTemplate {
            lang,
            year,
            rows: &rows,
        })?;
        let plain = template.render(NutritionPlainTemplate {
            lang,
            year,
            rows: &rows,
        })?;

        Ok(self
            .dispatch(&template, to, "Your nutritional report", html, plain)
            .await)
    }

    async fn dispatch(
        &self,
        template: &Template,
        to: &str,
        subject: &str,
        html: String,
        plain: String,
    ) -> DeliveryReport {
        let lang = template.lang();
        let email = Email {
            to: to.to_owned(),
            subject: rust_i18n::t!(subject, locale = lang).to_string(),
            html,
            plain,
        };

        let report = self.mailer.deliver(email).await;

        if report.success {
            tracing::info!(provider = self.mailer.provider_name(), "Email delivered");
            DeliveryReport::sent(rust_i18n::t!("email_sent", locale = lang, to = to))
        } else {
            tracing::warn!(
                provider = self.mailer.provider_name(),
                message = %report.message,
                "Email delivery failed"
            );
            report
        }
    }
}

fn recipient(to: &str) -> Result<&str, NotificationError> {
    let to = to.trim();
    if !is_valid_address(to) {
        return Err(NotificationError::InvalidAddress);
    }
    Ok(to)
}

fn year() -> i32 {
    OffsetDateTime::now_utc().year()
}
