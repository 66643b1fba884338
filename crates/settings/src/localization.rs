use icu_locid::{Locale, ParserError as LocaleParserError};
use icu_plurals::{PluralCategory as IcuPluralCategory, PluralOperands, PluralRules};
use serde::Deserialize;
use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

const DEFAULT_LOCALE_CODE: &str = "en-US";
const DEFAULT_DISPLAY_NAME: &str = "English (en-US)";

/// Catalogs compiled into the binary, loaded on top of the English fallback.
const BUILTIN_CATALOGS: &[(&str, &str)] = &[("de-DE.json", include_str!("../locales/de-DE.json"))];

const DEFAULT_STRINGS: &[(&str, &str)] = &[
    ("app.name", "Running Plan Builder"),
    ("action.yes", "Yes"),
    ("action.cancel", "Cancel"),
    ("action.save", "Save"),
    ("action.edit", "Edit"),
    ("action.delete", "Delete"),
    ("alert.import.failed", "The running plan could not be imported."),
    (
        "alert.import.wrong.file.info",
        "The selected file does not exist or cannot be read.",
    ),
    ("alert.export.failed", "The running plan could not be exported."),
    (
        "alert.runningplan.overwrite",
        "The current running plan will be discarded. Continue?",
    ),
    (
        "alert.runningplan.null",
        "Create or open a running plan first.",
    ),
    ("export.file.name", "runningplan"),
    ("misc.week", "Week"),
    ("monday", "Monday"),
    ("tuesday", "Tuesday"),
    ("wednesday", "Wednesday"),
    ("thursday", "Thursday"),
    ("friday", "Friday"),
    ("saturday", "Saturday"),
    ("sunday", "Sunday"),
    ("row.entry.label", "Week {0}, Day {1}"),
    ("row.duration", "{0} min"),
    ("row.unit.summary", "{0} min {1}"),
    ("table.column.week", "Week"),
    ("table.column.day", "Day"),
    ("table.column.duration", "Duration"),
    ("table.column.units", "Running units"),
    ("table.column.key", "Key"),
    ("table.column.name", "Movement"),
    ("table.column.running_infos", "Running infos"),
    (
        "table.placeholder.entries",
        "The running plan has no entries yet.",
    ),
    (
        "table.placeholder.units",
        "The entry has no running units yet.",
    ),
    ("movement.L", "Running"),
    ("movement.LS", "Slow running"),
    ("movement.G", "Walking"),
    ("movement.P", "Pause"),
];

const DEFAULT_PLURALS: &[(&str, &[(&str, &str)])] = &[
    (
        "plan.summary.entries",
        &[("one", "{count} entry"), ("other", "{count} entries")],
    ),
    (
        "entry.summary.units",
        &[("one", "{count} running unit"), ("other", "{count} running units")],
    ),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum PluralCategory {
    Zero,
    One,
    Two,
    Few,
    Many,
    Other,
}

impl PluralCategory {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "zero" => Some(Self::Zero),
            "one" => Some(Self::One),
            "two" => Some(Self::Two),
            "few" => Some(Self::Few),
            "many" => Some(Self::Many),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

impl From<IcuPluralCategory> for PluralCategory {
    fn from(value: IcuPluralCategory) -> Self {
        match value {
            IcuPluralCategory::Zero => PluralCategory::Zero,
            IcuPluralCategory::One => PluralCategory::One,
            IcuPluralCategory::Two => PluralCategory::Two,
            IcuPluralCategory::Few => PluralCategory::Few,
            IcuPluralCategory::Many => PluralCategory::Many,
            IcuPluralCategory::Other => PluralCategory::Other,
        }
    }
}

#[derive(Debug, Clone)]
enum Message {
    Simple(String),
    Plural(BTreeMap<PluralCategory, String>),
}

impl Message {
    fn render<'a>(
        &'a self,
        plural_rules: Option<&PluralRules>,
        params: &LocalizationParams<'_>,
    ) -> Cow<'a, str> {
        match self {
            Message::Simple(text) => render_template(text, params),
            Message::Plural(forms) => {
                let category = params
                    .count
                    .map(|value| select_plural_category(plural_rules, value))
                    .unwrap_or(PluralCategory::Other);
                let template = forms
                    .get(&category)
                    .or_else(|| forms.get(&PluralCategory::Other))
                    .map(|value| value.as_str())
                    .unwrap_or("");
                render_template(template, params)
            }
        }
    }
}

/// Positional (`{0}`, `{1}`) and count (`{count}`) values interpolated into a message.
#[derive(Debug, Clone, Copy)]
pub struct LocalizationParams<'a> {
    count: Option<u64>,
    positional: &'a [&'a str],
}

impl<'a> LocalizationParams<'a> {
    pub fn new(positional: &'a [&'a str]) -> Self {
        Self {
            count: None,
            positional,
        }
    }
}

impl LocalizationParams<'static> {
    pub fn empty() -> Self {
        LocalizationParams {
            count: None,
            positional: &[],
        }
    }

    pub fn count_only(count: u64) -> Self {
        LocalizationParams {
            count: Some(count),
            positional: &[],
        }
    }
}

#[derive(Debug, Error)]
pub enum LocalizationError {
    #[error("failed to enumerate locale directory {0}: {1}")]
    ReadDir(PathBuf, io::Error),
    #[error("failed to read locale file {0}: {1}")]
    ReadFile(PathBuf, io::Error),
    #[error("failed to parse locale file {0}: {1}")]
    ParseFile(PathBuf, serde_json::Error),
    #[error("duplicate locale code {0}")]
    DuplicateLocale(String),
    #[error("locale {locale} message '{key}' is missing plural 'other' form")]
    PluralMissingOther { locale: String, key: String },
    #[error("locale {locale} message '{key}' contains invalid plural category '{category}'")]
    InvalidPluralCategory {
        locale: String,
        key: String,
        category: String,
    },
    #[error("locale {locale} message '{key}' uses unsupported type '{kind}'")]
    UnsupportedMessageType {
        locale: String,
        key: String,
        kind: String,
    },
    #[error("locale identifier '{locale}' is invalid: {error}")]
    InvalidLocaleIdentifier {
        locale: String,
        error: LocaleParserError,
    },
}

#[derive(Debug, Clone)]
struct LocaleSummary {
    code: String,
    display_name: String,
}

#[derive(Debug, Clone)]
pub struct LocaleCatalogStats {
    pub code: String,
    pub display_name: String,
    pub total_entries: usize,
    pub plural_entries: usize,
}

#[derive(Debug, Clone)]
struct LocaleCatalog {
    summary: LocaleSummary,
    plural_rules: Option<Arc<PluralRules>>,
    messages: HashMap<String, Message>,
}

/// Key-based text lookup with an active locale and an English fallback.
/// （以鍵查詢在地化字串，缺少時回退至英文。）
///
/// Constructed explicitly and shared by handle; there is no global instance.
#[derive(Debug, Clone)]
pub struct LocalizationManager {
    catalogs: Vec<LocaleCatalog>,
    active: usize,
    fallback: usize,
}

#[derive(Debug, Deserialize)]
struct LocaleFile {
    locale: String,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    strings: HashMap<String, LocaleEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LocaleEntry {
    Simple(String),
    Typed(LocaleEntryTyped),
}

#[derive(Debug, Deserialize)]
struct LocaleEntryTyped {
    #[serde(rename = "type")]
    kind: String,
    #[serde(flatten)]
    forms: HashMap<String, String>,
}

impl LocalizationManager {
    /// Constructs a manager holding only the built-in English strings.
    /// （僅以內建英文字串建立語系管理器。）
    pub fn fallback() -> Self {
        Self {
            catalogs: vec![default_catalog()],
            active: 0,
            fallback: 0,
        }
    }

    /// English fallback plus every catalog compiled into the binary.
    /// （英文回退語系加上所有內建語系。）
    pub fn with_builtin_catalogs() -> Result<Self, LocalizationError> {
        let mut manager = Self::fallback();
        for (name, contents) in BUILTIN_CATALOGS {
            manager.add_catalog_source(Path::new(name), contents)?;
        }
        Ok(manager)
    }

    /// Loads extra locale files from the given directories on top of the built-in catalogs.
    /// （在內建語系之上，依序從多個目錄載入語系檔。）
    pub fn load_from_dirs<I, P>(paths: I) -> Result<Self, LocalizationError>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut manager = Self::with_builtin_catalogs()?;
        for path in paths {
            manager.load_directory(path.as_ref())?;
        }
        Ok(manager)
    }

    /// Returns the locale code of the active language.
    /// （回傳目前啟用語系的代碼字串。）
    pub fn active_code(&self) -> &str {
        self.catalogs[self.active].summary.code.as_str()
    }

    pub fn catalog_stats(&self) -> Vec<LocaleCatalogStats> {
        self.catalogs
            .iter()
            .map(|catalog| LocaleCatalogStats {
                code: catalog.summary.code.clone(),
                display_name: catalog.summary.display_name.clone(),
                total_entries: catalog.messages.len(),
                plural_entries: catalog
                    .messages
                    .values()
                    .filter(|message| matches!(message, Message::Plural(_)))
                    .count(),
            })
            .collect()
    }

    /// Returns keys the given locale lacks relative to the fallback catalog, sorted.
    /// （比對回退語系，回傳指定語系缺少的鍵。）
    pub fn missing_keys(&self, code: &str) -> Option<Vec<String>> {
        let catalog = self
            .catalogs
            .iter()
            .find(|catalog| catalog.summary.code == code)?;
        let mut missing: Vec<String> = self.catalogs[self.fallback]
            .messages
            .keys()
            .filter(|key| !catalog.messages.contains_key(*key))
            .cloned()
            .collect();
        missing.sort();
        Some(missing)
    }

    /// Activates the catalog for a locale tag.
    /// （依語系標籤切換目前的語系。）
    ///
    /// An exact match wins; otherwise the first catalog sharing the language
    /// subtag (`de-AT` selects `de-DE`). Returns `false` and keeps the current
    /// locale when nothing matches.
    pub fn select_locale(&mut self, tag: &str) -> bool {
        let Some(normalized) = normalize_locale_tag(tag) else {
            return false;
        };
        if let Some(index) = self
            .catalogs
            .iter()
            .position(|catalog| catalog.summary.code == normalized)
        {
            self.active = index;
            return true;
        }
        let language = language_subtag(&normalized);
        if let Some(index) = self
            .catalogs
            .iter()
            .position(|catalog| language_subtag(&catalog.summary.code) == language)
        {
            self.active = index;
            return true;
        }
        false
    }

    /// Retrieves a localized string; unknown keys are returned verbatim.
    pub fn text<'a>(&'a self, key: &'a str) -> Cow<'a, str> {
        self.text_with_params(key, &LocalizationParams::empty())
    }

    /// Retrieves a localized string with `{0}`-style positional values applied.
    pub fn text_args(&self, key: &str, values: &[&str]) -> String {
        self.text_with_params(key, &LocalizationParams::new(values))
            .into_owned()
    }

    /// Retrieves a pluralized message for `count`.
    pub fn text_count(&self, key: &str, count: u64) -> String {
        self.text_with_params(key, &LocalizationParams::count_only(count))
            .into_owned()
    }

    /// Retrieves a localized string, applying parameters when provided.
    /// （取得在地化字串，必要時套用參數。）
    pub fn text_with_params<'a>(
        &'a self,
        key: &'a str,
        params: &LocalizationParams<'_>,
    ) -> Cow<'a, str> {
        for index in [self.active, self.fallback] {
            let catalog = &self.catalogs[index];
            if let Some(message) = catalog.messages.get(key) {
                return message.render(catalog.plural_rules.as_deref(), params);
            }
        }
        Cow::Borrowed(key)
    }

    fn load_directory(&mut self, dir: &Path) -> Result<(), LocalizationError> {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            // A missing directory only means no extra catalogs are installed.
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(err) => return Err(LocalizationError::ReadDir(dir.to_path_buf(), err)),
        };

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|err| LocalizationError::ReadDir(dir.to_path_buf(), err))?;
            let path = entry.path();
            let metadata = entry
                .metadata()
                .map_err(|err| LocalizationError::ReadFile(path.clone(), err))?;
            if metadata.is_file() && path.extension().and_then(|ext| ext.to_str()) == Some("json")
            {
                paths.push(path);
            }
        }
        paths.sort();

        for path in paths {
            let contents = fs::read_to_string(&path)
                .map_err(|err| LocalizationError::ReadFile(path.clone(), err))?;
            self.add_catalog_source(&path, &contents)?;
        }
        Ok(())
    }

    fn add_catalog_source(&mut self, origin: &Path, contents: &str) -> Result<(), LocalizationError> {
        let file: LocaleFile = serde_json::from_str(contents)
            .map_err(|err| LocalizationError::ParseFile(origin.to_path_buf(), err))?;
        let display_name = file
            .display_name
            .clone()
            .unwrap_or_else(|| file.locale.clone());
        let messages = build_messages(&file.locale, file.strings)?;
        let plural_rules = plural_rules_for(&file.locale)?;

        if file.locale == self.catalogs[self.fallback].summary.code {
            // Overrides for the fallback locale merge into the built-in strings.
            let fallback = &mut self.catalogs[self.fallback];
            fallback.messages.extend(messages);
            fallback.summary.display_name = display_name;
            return Ok(());
        }
        if self
            .catalogs
            .iter()
            .any(|catalog| catalog.summary.code == file.locale)
        {
            return Err(LocalizationError::DuplicateLocale(file.locale));
        }
        tracing::debug!(locale = %file.locale, origin = %origin.display(), "loaded locale catalog");
        self.catalogs.push(LocaleCatalog {
            summary: LocaleSummary {
                code: file.locale,
                display_name,
            },
            plural_rules,
            messages,
        });
        Ok(())
    }
}

/// Normalizes `de_AT`, `de-at`, `de_DE.UTF-8` and similar into a BCP-47 tag.
/// （將系統語系字串正規化為 BCP-47 標籤。）
///
/// Returns `None` for empty input and POSIX placeholders such as `C`.
pub fn normalize_locale_tag(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let without_suffix = trimmed
        .split(|c: char| c == '.' || c == '@')
        .next()
        .unwrap_or_default()
        .replace('_', "-");
    if without_suffix.is_empty() {
        return None;
    }
    Locale::from_str(&without_suffix)
        .ok()
        .map(|locale| locale.to_string())
}

/// Locale derived from `LC_ALL`, `LC_MESSAGES` or `LANG`, defaulting to `en-US`.
pub fn system_locale() -> String {
    ["LC_ALL", "LC_MESSAGES", "LANG"]
        .iter()
        .filter_map(|name| env::var(name).ok())
        .find_map(|value| normalize_locale_tag(&value))
        .unwrap_or_else(|| DEFAULT_LOCALE_CODE.to_string())
}

fn language_subtag(tag: &str) -> &str {
    tag.split('-').next().unwrap_or(tag)
}

fn default_catalog() -> LocaleCatalog {
    let plural_rules = plural_rules_for(DEFAULT_LOCALE_CODE).ok().flatten();
    let mut messages = HashMap::new();
    for (key, value) in DEFAULT_STRINGS {
        messages.insert((*key).to_string(), Message::Simple((*value).to_string()));
    }
    for (key, forms) in DEFAULT_PLURALS {
        let forms = forms
            .iter()
            .filter_map(|(category, template)| {
                PluralCategory::parse(category).map(|parsed| (parsed, (*template).to_string()))
            })
            .collect();
        messages.insert((*key).to_string(), Message::Plural(forms));
    }
    LocaleCatalog {
        summary: LocaleSummary {
            code: DEFAULT_LOCALE_CODE.to_string(),
            display_name: DEFAULT_DISPLAY_NAME.to_string(),
        },
        plural_rules,
        messages,
    }
}

fn plural_rules_for(locale: &str) -> Result<Option<Arc<PluralRules>>, LocalizationError> {
    let parsed =
        Locale::from_str(locale).map_err(|error| LocalizationError::InvalidLocaleIdentifier {
            locale: locale.to_string(),
            error,
        })?;
    match PluralRules::try_new_cardinal(&parsed.into()) {
        Ok(rules) => Ok(Some(Arc::new(rules))),
        Err(_) => Ok(None),
    }
}

fn build_messages(
    locale: &str,
    entries: HashMap<String, LocaleEntry>,
) -> Result<HashMap<String, Message>, LocalizationError> {
    let mut messages = HashMap::new();
    for (key, entry) in entries {
        let message = match entry {
            LocaleEntry::Simple(value) => Message::Simple(value),
            LocaleEntry::Typed(typed) => {
                if typed.kind != "plural" {
                    return Err(LocalizationError::UnsupportedMessageType {
                        locale: locale.to_string(),
                        key: key.clone(),
                        kind: typed.kind,
                    });
                }
                let mut forms = BTreeMap::new();
                for (category, template) in typed.forms {
                    let parsed = PluralCategory::parse(&category).ok_or(
                        LocalizationError::InvalidPluralCategory {
                            locale: locale.to_string(),
                            key: key.clone(),
                            category,
                        },
                    )?;
                    forms.insert(parsed, template);
                }
                if !forms.contains_key(&PluralCategory::Other) {
                    return Err(LocalizationError::PluralMissingOther {
                        locale: locale.to_string(),
                        key: key.clone(),
                    });
                }
                Message::Plural(forms)
            }
        };
        messages.insert(key, message);
    }
    Ok(messages)
}

fn render_template<'a>(template: &'a str, params: &LocalizationParams<'_>) -> Cow<'a, str> {
    if params.count.is_none() && (params.positional.is_empty() || !template.contains('{')) {
        return Cow::Borrowed(template);
    }

    let mut current: Cow<'a, str> = Cow::Borrowed(template);
    if let Some(count) = params.count {
        if current.contains("{count}") {
            current = Cow::Owned(current.replace("{count}", &count.to_string()));
        }
    }

    for (idx, value) in params.positional.iter().enumerate() {
        let placeholder = format!("{{{idx}}}");
        if current.contains(&placeholder) {
            current = Cow::Owned(current.replace(&placeholder, value));
        }
    }

    current
}

fn select_plural_category(rules: Option<&PluralRules>, count: u64) -> PluralCategory {
    if let Some(rules) = rules {
        if let Ok(operands) = PluralOperands::from_str(&count.to_string()) {
            return PluralCategory::from(rules.category_for(operands));
        }
    }
    if count == 1 {
        PluralCategory::One
    } else {
        PluralCategory::Other
    }
}
