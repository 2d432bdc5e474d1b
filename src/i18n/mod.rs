//! Message catalog: localized reply templates.
//!
//! A pure `(language, key) → template` lookup. Unknown languages fall back to
//! English; templates missing from a language also fall back to English.
//! Templates carry `{name}` placeholders filled in by [`render`].

mod en;
mod es;
mod pt;

/// Returned when neither the requested language nor English has a template.
pub const MISSING_TEMPLATE: &str = "Message key not found.";

/// Languages the catalog ships templates for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    En,
    Es,
    Pt,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::En, Language::Es, Language::Pt];

    /// Resolve a platform locale such as `"pt-BR"` to a catalog language.
    ///
    /// Only the primary subtag is considered; anything unknown maps to English.
    pub fn from_code(code: Option<&str>) -> Self {
        let primary = code
            .and_then(|c| c.split('-').next())
            .map(|c| c.trim().to_ascii_lowercase())
            .unwrap_or_default();
        match primary.as_str() {
            "es" => Self::Es,
            "pt" => Self::Pt,
            _ => Self::En,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Es => "es",
            Self::Pt => "pt",
        }
    }
}

/// Keys of every user-facing template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKey {
    RegisterStart,
    ValidateEmail,
    RegisterFirstName,
    RegisterLastName,
    RegisterTimezone,
    RegisterConfirmation,
    RegisterConfirmationWithTimezone,
    InvalidConfirmation,
    RegisterCancelled,
    RegistrationFailed,
    RegistrationError,
    PaymentSuccess,
    PaymentFailure,
    PortalReturn,
    GenericError,
    GenericDowntime,
    SupportPrompt,
    SupportMessage,
    SupportCancelled,
    SupportUnavailable,
    HelpMessage,
    UserNotFound,
    RegisterFirst,
    ProfileInfo,
    ManageUrl,
    AudioProcessed,
    UnknownError,
}

/// Features that require an account, named in "register first" hints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    Balance,
    Reminders,
    Profile,
    Upgrade,
    Receipts,
    Documents,
    Audio,
    Messages,
}

impl Feature {
    /// Localized phrase completing "You need to register first to …".
    pub fn phrase(&self, lang: Language) -> &'static str {
        use Feature::*;
        match lang {
            Language::En => match self {
                Balance => "view your balance",
                Reminders => "view your reminders",
                Profile => "view your profile",
                Upgrade => "upgrade",
                Receipts => "process receipts",
                Documents => "process documents",
                Audio => "process audio",
                Messages => "chat with the assistant",
            },
            Language::Es => match self {
                Balance => "ver tu balance",
                Reminders => "ver tus recordatorios",
                Profile => "ver tu perfil",
                Upgrade => "mejorar tu plan",
                Receipts => "procesar recibos",
                Documents => "procesar documentos",
                Audio => "procesar audio",
                Messages => "hablar con el asistente",
            },
            Language::Pt => match self {
                Balance => "ver seu saldo",
                Reminders => "ver seus lembretes",
                Profile => "ver seu perfil",
                Upgrade => "fazer upgrade",
                Receipts => "processar recibos",
                Documents => "processar documentos",
                Audio => "processar áudio",
                Messages => "conversar com o assistente",
            },
        }
    }
}

/// A bot command advertised in the Telegram command menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandInfo {
    pub name: &'static str,
    pub description: &'static str,
}

/// Look up a raw template.
pub fn template(lang: Language, key: MessageKey) -> &'static str {
    table(lang)(key)
        .or_else(|| en::template(key))
        .unwrap_or(MISSING_TEMPLATE)
}

/// Look up a template and fill its `{name}` placeholders.
pub fn message(lang: Language, key: MessageKey, args: &[(&str, &str)]) -> String {
    render(template(lang, key), args)
}

/// Command menu for a language.
pub fn commands(lang: Language) -> &'static [CommandInfo] {
    match lang {
        Language::En => en::COMMANDS,
        Language::Es => es::COMMANDS,
        Language::Pt => pt::COMMANDS,
    }
}

fn table(lang: Language) -> fn(MessageKey) -> Option<&'static str> {
    match lang {
        Language::En => en::template,
        Language::Es => es::template,
        Language::Pt => pt::template,
    }
}

/// Fill `{name}` placeholders in a single pass.
///
/// Substituted values are never rescanned, so user input containing braces
/// comes through verbatim. Placeholders without a matching argument are kept.
pub fn render(template: &str, args: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) => {
                let name = &after[..close];
                match args.iter().find(|(k, _)| *k == name) {
                    Some((_, value)) => out.push_str(value),
                    None => {
                        out.push('{');
                        out.push_str(name);
                        out.push('}');
                    }
                }
                rest = &after[close + 1..];
            }
            None => {
                out.push_str(&rest[open..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}
