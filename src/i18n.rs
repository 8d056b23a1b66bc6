use crate::models::{Mood, WorkoutType};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Cs,
    De,
    Sk,
    Fr,
    Es,
    It,
    Pl,
    Nl,
    Pt,
    Sv,
    Hu,
    Da,
    Fi,
    No,
    Ro,
    Tr,
    El,
    Ja,
    Zh,
}

impl Language {
    pub const DEFAULT: Language = Language::En;

    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Cs => "cs",
            Language::De => "de",
            Language::Sk => "sk",
            Language::Fr => "fr",
            Language::Es => "es",
            Language::It => "it",
            Language::Pl => "pl",
            Language::Nl => "nl",
            Language::Pt => "pt",
            Language::Sv => "sv",
            Language::Hu => "hu",
            Language::Da => "da",
            Language::Fi => "fi",
            Language::No => "no",
            Language::Ro => "ro",
            Language::Tr => "tr",
            Language::El => "el",
            Language::Ja => "ja",
            Language::Zh => "zh",
        }
    }

    /// English name, used to tell the model which language to answer in.
    pub fn english_name(self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Cs => "Czech",
            Language::De => "German",
            Language::Sk => "Slovak",
            Language::Fr => "French",
            Language::Es => "Spanish",
            Language::It => "Italian",
            Language::Pl => "Polish",
            Language::Nl => "Dutch",
            Language::Pt => "Portuguese",
            Language::Sv => "Swedish",
            Language::Hu => "Hungarian",
            Language::Da => "Danish",
            Language::Fi => "Finnish",
            Language::No => "Norwegian",
            Language::Ro => "Romanian",
            Language::Tr => "Turkish",
            Language::El => "Greek",
            Language::Ja => "Japanese",
            Language::Zh => "Chinese",
        }
    }

    pub fn parse(code: &str) -> Option<Language> {
        serde_json::from_value(serde_json::Value::String(code.trim().to_lowercase())).ok()
    }
}

/// Field set shown to users. Languages without their own table use `EN`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Translations {
    pub login: &'static str,
    pub register: &'static str,
    pub email: &'static str,
    pub password: &'static str,
    pub confirm_password: &'static str,
    pub name: &'static str,
    pub birth_date: &'static str,
    pub weight: &'static str,
    pub login_to_account: &'static str,
    pub data_stored_locally: &'static str,
    pub password_rule: &'static str,
    pub authenticating: &'static str,
    pub logout: &'static str,
    pub add_activity: &'static str,
    pub dashboard: &'static str,
    pub steps: &'static str,
    pub standing: &'static str,
    pub sleep: &'static str,
    pub resting_hr: &'static str,
    pub exercise: &'static str,
    pub weekly_challenge: &'static str,
    pub thinking: &'static str,
    pub run_analysis: &'static str,
    pub record_day: &'static str,
    pub workout_type: &'static str,
    pub mood: &'static str,
    pub settings: &'static str,
    pub language: &'static str,
    pub welcome: &'static str,
    pub first_record_prompt: &'static str,
    pub error_user_not_found: &'static str,
    pub error_wrong_password: &'static str,
    pub error_fill_all: &'static str,
    pub error_passwords_no_match: &'static str,
    pub error_email_taken: &'static str,
    pub error_rate_limited: &'static str,
    #[serde(skip)]
    moods: [&'static str; 4],
    #[serde(skip)]
    workouts: [&'static str; 28],
}

impl Translations {
    pub fn mood(&self, mood: Mood) -> &'static str {
        let index = Mood::ALL.iter().position(|m| *m == mood).unwrap_or(0);
        self.moods[index]
    }

    pub fn workout(&self, workout: WorkoutType) -> &'static str {
        let index = WorkoutType::ALL
            .iter()
            .position(|w| *w == workout)
            .unwrap_or(0);
        self.workouts[index]
    }
}

pub static EN: Translations = Translations {
    login: "Login",
    register: "Register",
    email: "Email",
    password: "Password",
    confirm_password: "Confirm Password",
    name: "Name",
    birth_date: "Birth Date",
    weight: "Weight",
    login_to_account: "Login to your fitness account",
    data_stored_locally: "Data is stored on this device.",
    password_rule: "8+ characters and 2+ digits",
    authenticating: "Authenticating...",
    logout: "Logout",
    add_activity: "Add Activity",
    dashboard: "Dashboard",
    steps: "Steps",
    standing: "Standing",
    sleep: "Sleep",
    resting_hr: "Resting HR",
    exercise: "Exercise",
    weekly_challenge: "Weekly Challenge (Min: 1000+ kcal)",
    thinking: "FitGo AI is analyzing your fitness...",
    run_analysis: "Run Physiological Analysis",
    record_day: "Record Day",
    workout_type: "Workout Type",
    mood: "Mood",
    settings: "Profile Settings",
    language: "Language",
    welcome: "Welcome to FitGo",
    first_record_prompt: "Enter your first record. AI expects 1000+ kcal/day.",
    error_user_not_found: "User not found",
    error_wrong_password: "Incorrect password",
    error_fill_all: "Please fill this field",
    error_passwords_no_match: "Passwords do not match",
    error_email_taken: "This email is already registered",
    error_rate_limited: "AI service is busy. Please try again in a moment.",
    moods: ["Great", "Good", "Average", "Tired"],
    workouts: [
        "Badminton",
        "Basketball",
        "Biathlon",
        "Cross-country Skiing",
        "Curling",
        "Cycling",
        "Downhill Skiing",
        "Figure Skating",
        "Football",
        "Golf",
        "Gym",
        "Hiking",
        "Ice Hockey",
        "Ice Skating",
        "Kayaking",
        "Rock Climbing",
        "Running",
        "Sailing",
        "Ski Jumping",
        "Ski Touring",
        "Sledding",
        "Snowboarding",
        "Speed Skating",
        "Surfing",
        "Swimming",
        "Tennis",
        "Volleyball",
        "Yoga",
    ],
};

pub static CS: Translations = Translations {
    login: "Přihlášení",
    register: "Registrace",
    email: "E-mail",
    password: "Heslo",
    confirm_password: "Potvrzení hesla",
    name: "Jméno",
    birth_date: "Narození",
    weight: "Váha",
    login_to_account: "Přihlaste se ke svému fitness účtu",
    data_stored_locally: "Data jsou uložena v tomto zařízení.",
    password_rule: "Min. 8 znaků a 2 číslice",
    authenticating: "Ověřování...",
    logout: "Odhlásit se",
    add_activity: "Přidat aktivitu",
    dashboard: "Dashboard",
    steps: "Kroky",
    standing: "Stání",
    sleep: "Spánek",
    resting_hr: "Klidový tep",
    exercise: "Cvičení",
    weekly_challenge: "Týdenní Výzva (Standard: 1000+ kcal)",
    thinking: "FitGo AI analyzuje tvou kondici...",
    run_analysis: "Spustit Fyziologickou Analýzu",
    record_day: "Záznam dne",
    workout_type: "Typ cvičení",
    mood: "Nálada",
    settings: "Nastavení Profilu",
    language: "Jazyk",
    welcome: "Vítejte ve FitGo",
    first_record_prompt: "Zadejte první záznam. AI očekává 1000+ kcal denně.",
    error_user_not_found: "Uživatel nenalezen",
    error_wrong_password: "Nesprávné heslo",
    error_fill_all: "Toto pole je povinné",
    error_passwords_no_match: "Hesla se neshodují",
    error_email_taken: "Tento e-mail je již registrován",
    error_rate_limited: "AI služba je přetížená. Zkuste to prosím za chvíli.",
    moods: ["Skvělý", "Dobrý", "Průměrný", "Unavený"],
    workouts: [
        "Badminton",
        "Basketbal",
        "Biatlon",
        "Běžecké lyžování",
        "Curling",
        "Cyklistika",
        "Sjezdové lyžování",
        "Krasobruslení",
        "Fotbal",
        "Golf",
        "Posilovna",
        "Turistika",
        "Lední hokej",
        "Bruslení",
        "Kajakářství",
        "Horolezectví",
        "Běh",
        "Jachting",
        "Skoky na lyžích",
        "Skialpinismus",
        "Sáňkování",
        "Snowboarding",
        "Rychlobruslení",
        "Surfování",
        "Plavání",
        "Tenis",
        "Volejbal",
        "Jóga",
    ],
};

fn table(lang: Language) -> Option<&'static Translations> {
    match lang {
        Language::En => Some(&EN),
        Language::Cs => Some(&CS),
        _ => None,
    }
}

/// Translation table for `lang`, falling back to the default locale.
pub fn translations(lang: Language) -> &'static Translations {
    table(lang)
        .or_else(|| table(Language::DEFAULT))
        .unwrap_or(&EN)
}

pub fn is_fully_translated(lang: Language) -> bool {
    table(lang).is_some()
}

#[derive(Debug, Clone, Serialize)]
pub struct SelectOption {
    pub value: &'static str,
    pub label: &'static str,
}

pub fn workout_options(lang: Language) -> Vec<SelectOption> {
    let t = translations(lang);
    let mut options: Vec<SelectOption> = WorkoutType::ALL
        .iter()
        .map(|w| SelectOption {
            value: w.key(),
            label: t.workout(*w),
        })
        .collect();
    options.sort_by(|a, b| collate(lang, a.label, b.label));
    options
}

pub fn mood_options(lang: Language) -> Vec<SelectOption> {
    let t = translations(lang);
    let mut options: Vec<SelectOption> = Mood::ALL
        .iter()
        .map(|m| SelectOption {
            value: m.key(),
            label: t.mood(*m),
        })
        .collect();
    options.sort_by(|a, b| collate(lang, a.label, b.label));
    options
}

/// Languages offered in the picker, labelled in their own language.
pub fn language_options() -> Vec<SelectOption> {
    let mut options = vec![
        SelectOption {
            value: Language::Cs.code(),
            label: "Čeština",
        },
        SelectOption {
            value: Language::En.code(),
            label: "English",
        },
    ];
    options.sort_by(|a, b| collate(Language::DEFAULT, a.label, b.label));
    options
}

/// Compares two labels the way `lang` orders them alphabetically.
pub fn collate(lang: Language, a: &str, b: &str) -> Ordering {
    collation_key(lang, a)
        .cmp(&collation_key(lang, b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| a.cmp(b))
}

// Primary weights are spaced by four so that locale-specific letters can sit
// between a base letter and the next one.
fn collation_key(lang: Language, text: &str) -> Vec<u32> {
    let lower: Vec<char> = text.to_lowercase().chars().collect();
    let mut key = Vec::with_capacity(lower.len());
    let mut i = 0;
    while i < lower.len() {
        let c = lower[i];
        if matches!(lang, Language::Cs | Language::Sk) {
            if c == 'c' && lower.get(i + 1) == Some(&'h') {
                key.push(weight('h') + 2);
                i += 2;
                continue;
            }
            if let Some(base) = hacek_letter(c) {
                key.push(weight(base) + 1);
                i += 1;
                continue;
            }
        }
        if c.is_whitespace() || c == '-' {
            key.push(0);
        } else {
            key.push(weight(fold_diacritics(c)));
        }
        i += 1;
    }
    key
}

fn weight(c: char) -> u32 {
    (c as u32) * 4
}

fn hacek_letter(c: char) -> Option<char> {
    match c {
        'č' => Some('c'),
        'ř' => Some('r'),
        'š' => Some('s'),
        'ž' => Some('z'),
        _ => None,
    }
}

fn fold_diacritics(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ä' | 'ã' | 'å' | 'ą' => 'a',
        'č' | 'ć' | 'ç' => 'c',
        'ď' => 'd',
        'é' | 'è' | 'ê' | 'ë' | 'ě' | 'ę' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ľ' | 'ĺ' | 'ł' => 'l',
        'ň' | 'ń' | 'ñ' => 'n',
        'ó' | 'ò' | 'ô' | 'ö' | 'õ' | 'ő' => 'o',
        'ř' | 'ŕ' => 'r',
        'š' | 'ś' | 'ş' => 's',
        'ť' | 'ţ' => 't',
        'ú' | 'ù' | 'û' | 'ü' | 'ů' | 'ű' => 'u',
        'ý' | 'ÿ' => 'y',
        'ž' | 'ź' | 'ż' => 'z',
        other => other,
    }
}
