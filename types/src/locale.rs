//! Localized user-facing strings.
//!
//! The session only ever asks a [`Localizer`] for text; swapping the
//! implementation changes every label without touching the engine.

use std::borrow::Cow;

use crate::model::{ModelCategory, ModelFeature};
use crate::settings::Language;
use crate::text::fill_placeholders;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextKey {
    Title,
    Ready,
    LoadingModels,
    ModelsLoaded,
    ErrorLoadingModels,
    SendingRequest,
    ReceivingResponse,
    ResponseReceived,
    ChatCleared,
    ChatSaved,
    ResponseCopied,
    CopyError,
    ClearError,
    NoResponsesToCopy,
    SendError,
    EnterMessage,
    SelectModel,
    MaxFiles,
    /// Placeholder: `{filename}`.
    FileTooLarge,
    /// Placeholder: `{filename}`.
    FileUnreadable,
    ErrorSendingMessage,
    ConfirmClearChat,
    /// Placeholder: `{filename}`.
    FileContent,
    /// Placeholder: `{filename}`.
    ImageFile,
    User,
    Ai,
    ModelsTimeout,
    ModelsTimeoutMessage,
    RetryButton,
    CancelButton,
    Recommended,
    TextAndImages,
    TextOnly,
    AudioCategory,
    ImagesFeature,
    AudioFeature,
    FunctionsFeature,
    ReasoningFeature,
}

impl TextKey {
    #[must_use]
    pub const fn for_category(category: ModelCategory) -> Self {
        match category {
            ModelCategory::Recommended => TextKey::Recommended,
            ModelCategory::Images => TextKey::TextAndImages,
            ModelCategory::TextOnly => TextKey::TextOnly,
            ModelCategory::Audio => TextKey::AudioCategory,
        }
    }

    #[must_use]
    pub const fn for_feature(feature: ModelFeature) -> Self {
        match feature {
            ModelFeature::Images => TextKey::ImagesFeature,
            ModelFeature::Audio => TextKey::AudioFeature,
            ModelFeature::Functions => TextKey::FunctionsFeature,
            ModelFeature::Reasoning => TextKey::ReasoningFeature,
        }
    }
}

pub trait Localizer {
    fn text(&self, key: TextKey) -> Cow<'_, str>;

    /// Look up `key` and fill its `{name}` placeholders.
    fn format(&self, key: TextKey, values: &[(&str, &str)]) -> String {
        fill_placeholders(&self.text(key), values)
    }
}

/// Built-in English and Russian tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuiltinLocalizer {
    language: Language,
}

impl BuiltinLocalizer {
    #[must_use]
    pub const fn new(language: Language) -> Self {
        Self { language }
    }

    #[must_use]
    pub const fn language(&self) -> Language {
        self.language
    }

    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }
}

impl Localizer for BuiltinLocalizer {
    fn text(&self, key: TextKey) -> Cow<'_, str> {
        let text = match self.language {
            Language::En => english(key),
            Language::Ru => russian(key),
        };
        Cow::Borrowed(text)
    }
}

fn english(key: TextKey) -> &'static str {
    match key {
        TextKey::Title => "Polination AI Chat",
        TextKey::Ready => "Ready to work",
        TextKey::LoadingModels => "Loading models...",
        TextKey::ModelsLoaded => "Models loaded",
        TextKey::ErrorLoadingModels => "Error loading models",
        TextKey::SendingRequest => "Sending request...",
        TextKey::ReceivingResponse => "Receiving response...",
        TextKey::ResponseReceived => "Response received",
        TextKey::ChatCleared => "Chat cleared",
        TextKey::ChatSaved => "Chat saved",
        TextKey::ResponseCopied => "Response copied to clipboard",
        TextKey::CopyError => "Copy error",
        TextKey::ClearError => "Could not clear chat history",
        TextKey::NoResponsesToCopy => "No responses to copy",
        TextKey::SendError => "Send error",
        TextKey::EnterMessage => "Enter message or select files",
        TextKey::SelectModel => "Select AI model",
        TextKey::MaxFiles => "Maximum 10 files at once",
        TextKey::FileTooLarge => "File {filename} is too large (maximum 10MB)",
        TextKey::FileUnreadable => "Cannot read file {filename}",
        TextKey::ErrorSendingMessage => "Error sending message: ",
        TextKey::ConfirmClearChat => "Clear entire chat history?",
        TextKey::FileContent => "File content {filename}:",
        TextKey::ImageFile => "Image: {filename}",
        TextKey::User => "User",
        TextKey::Ai => "AI",
        TextKey::ModelsTimeout => "Models Loading Timeout",
        TextKey::ModelsTimeoutMessage => {
            "Failed to load AI models within 20 seconds. This might be due to network issues or server problems."
        }
        TextKey::RetryButton => "Retry",
        TextKey::CancelButton => "Cancel",
        TextKey::Recommended => "Recommended",
        TextKey::TextAndImages => "Text and Images",
        TextKey::TextOnly => "Text Only",
        TextKey::AudioCategory | TextKey::AudioFeature => "Audio",
        TextKey::ImagesFeature => "Images",
        TextKey::FunctionsFeature => "Functions",
        TextKey::ReasoningFeature => "Reasoning",
    }
}

fn russian(key: TextKey) -> &'static str {
    match key {
        TextKey::Title => "Polination AI Chat",
        TextKey::Ready => "Готов к работе",
        TextKey::LoadingModels => "Загрузка моделей...",
        TextKey::ModelsLoaded => "Модели загружены",
        TextKey::ErrorLoadingModels => "Ошибка загрузки моделей",
        TextKey::SendingRequest => "Отправка запроса...",
        TextKey::ReceivingResponse => "Получение ответа...",
        TextKey::ResponseReceived => "Ответ получен",
        TextKey::ChatCleared => "Чат очищен",
        TextKey::ChatSaved => "Чат сохранен",
        TextKey::ResponseCopied => "Ответ скопирован в буфер обмена",
        TextKey::CopyError => "Ошибка копирования",
        TextKey::ClearError => "Не удалось очистить историю чата",
        TextKey::NoResponsesToCopy => "Нет ответов для копирования",
        TextKey::SendError => "Ошибка отправки",
        TextKey::EnterMessage => "Введите сообщение или выберите файлы",
        TextKey::SelectModel => "Выберите модель AI",
        TextKey::MaxFiles => "Максимум 10 файлов за раз",
        TextKey::FileTooLarge => "Файл {filename} слишком большой (максимум 10MB)",
        TextKey::FileUnreadable => "Не удалось прочитать файл {filename}",
        TextKey::ErrorSendingMessage => "Произошла ошибка при отправке сообщения: ",
        TextKey::ConfirmClearChat => "Очистить всю историю чата?",
        TextKey::FileContent => "Содержимое файла {filename}:",
        TextKey::ImageFile => "Изображение: {filename}",
        TextKey::User => "Пользователь",
        TextKey::Ai => "AI",
        TextKey::ModelsTimeout => "Таймаут загрузки моделей",
        TextKey::ModelsTimeoutMessage => {
            "Не удалось загрузить модели AI за 20 секунд. Это может быть связано с проблемами сети или сервера."
        }
        TextKey::RetryButton => "Повторить",
        TextKey::CancelButton => "Отмена",
        TextKey::Recommended => "Рекомендуемые",
        TextKey::TextAndImages => "Текст и Изображения",
        TextKey::TextOnly => "Только текст",
        TextKey::AudioCategory | TextKey::AudioFeature => "Аудио",
        TextKey::ImagesFeature => "Изображения",
        TextKey::FunctionsFeature => "Функции",
        TextKey::ReasoningFeature => "Рассуждения",
    }
}
