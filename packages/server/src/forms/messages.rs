//! Visitor-facing texts. The site is Russian-language.

pub const NAME_LENGTH: &str = "Имя должно содержать от 2 до 100 символов";
pub const PHONE_INVALID: &str = "Укажите корректный номер телефона";
pub const EMAIL_INVALID: &str = "Укажите корректный email адрес";
pub const MESSAGE_LENGTH: &str = "Сообщение должно содержать от 10 до 2000 символов";
pub const LOCATION_LENGTH: &str = "Город/район должен содержать от 2 до 100 символов";
pub const RATING_REQUIRED: &str = "Поставьте оценку от 1 до 5";
pub const REVIEW_TEXT_LENGTH: &str = "Отзыв должен содержать от 20 до 1000 символов";
pub const FORM_ERRORS: &str = "Пожалуйста, исправьте ошибки в форме";
pub const INVALID_BODY: &str = "Некорректный формат запроса";

pub const RATE_LIMIT: &str = "Слишком много запросов. Пожалуйста, подождите минуту.";
pub const SMTP_NOT_CONFIGURED: &str = "Ошибка отправки. Попробуйте позже или свяжитесь по телефону.";
pub const SMTP_ERROR: &str = "SMTP не настроен на сервере";
pub const SERVER_ERROR: &str =
    "Произошла ошибка при отправке. Пожалуйста, попробуйте позже или свяжитесь с нами по телефону.";
pub const INTERNAL_ERROR: &str = "Внутренняя ошибка сервера";

pub const CONTACT_SUCCESS: &str =
    "Спасибо! Ваше сообщение отправлено. Мы свяжемся с вами в ближайшее время.";
pub const REVIEW_SUCCESS: &str = "Спасибо за отзыв! Он появится на сайте после проверки.";

pub const CONTACT_SUBJECT: &str = "Новая заявка с сайта";
pub const CONTACT_HEADING: &str = "Новая заявка с формы обратной связи";
pub const REVIEW_SUBJECT: &str = "Новый отзыв с сайта";
pub const REVIEW_HEADING: &str = "Новый отзыв с формы на сайте";
pub const NOT_PROVIDED: &str = "Не указан";

pub fn rate_limit_detail(max_requests: u32) -> String {
    format!("Превышен лимит запросов (максимум {max_requests} в минуту)")
}
