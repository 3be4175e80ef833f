/// Column names and built-in lookup tables shared across the codebase

// Required columns per dataset
pub const ORBIS_ID_COLUMN: &str = "id";
pub const ORBIS_NAME_COLUMN: &str = "orbis_name";
pub const KUNUNU_ID_COLUMN: &str = "kununu_id";
pub const KUNUNU_NAME_COLUMN: &str = "kununu_name";

/// Column added to every matched row
pub const MATCH_TYPE_COLUMN: &str = "match_type";

/// Sentinel used by Orbis for unknown numeric values
pub const NOT_AVAILABLE: &str = "n.a.";

pub const DEFAULT_COMMON_WORD_PERCENTILE: f64 = 99.0;

// Translation collaborator
pub const TRANSLATE_ENDPOINT: &str = "https://translation.googleapis.com/language/translate/v2";
pub const TRANSLATE_SOURCE_LANGUAGE: &str = "de";
pub const TRANSLATE_API_KEY_VAR: &str = "GOOGLE_TRANSLATE_API_KEY";

// Output file names written by the CSV sink
pub const MATCHES_FILE: &str = "matches.csv";
pub const ORBIS_UNMATCHED_FILE: &str = "orbis_unmatched.csv";
pub const KUNUNU_UNMATCHED_FILE: &str = "kununu_unmatched.csv";

/// Full legal-form spellings and the abbreviation they collapse to.
/// Names are already preprocessed when this runs, so umlauts have been
/// stripped ("beschränkter" arrives as "beschrnkter").
pub const DEFAULT_ABBREVIATIONS: &[(&str, &str)] = &[
    ("gesellschaft mit beschraenkter haftung", "gmbh"),
    ("gesellschaft mit beschrankter haftung", "gmbh"),
    ("gesellschaft mit beschrnkter haftung", "gmbh"),
    ("gmbh und co kg", "gmbh & co kg"),
    ("gmbh u co kg", "gmbh & co kg"),
    ("kommanditgesellschaft auf aktien", "kgaa"),
    ("kommanditgesellschaft", "kg"),
    ("aktiengesellschaft", "ag"),
    ("offene handelsgesellschaft", "ohg"),
    ("gesellschaft buergerlichen rechts", "gbr"),
    ("gesellschaft brgerlichen rechts", "gbr"),
    ("unternehmergesellschaft haftungsbeschraenkt", "ug"),
    ("unternehmergesellschaft haftungsbeschrnkt", "ug"),
    ("eingetragener verein", "ev"),
    ("eingetragene genossenschaft", "eg"),
    ("europaeische gesellschaft", "se"),
];

/// Legal-form suffixes, checked in order. Longer forms come first so that
/// "gmbh & co kg" wins over "kg". The leading space keeps "ag" from eating
/// the end of a word like "verlag". The "und" spellings cover names that
/// already went through the umlaut step.
pub const DEFAULT_SUFFIXES: &[&str] = &[
    " gmbh & co kgaa",
    " gmbh und co kgaa",
    " gmbh & co kg",
    " gmbh und co kg",
    " gmbh & co ohg",
    " gmbh und co ohg",
    " ag & co kgaa",
    " ag und co kgaa",
    " ag & co kg",
    " ag und co kg",
    " se & co kgaa",
    " se und co kgaa",
    " se & co kg",
    " se und co kg",
    " ug haftungsbeschrnkt",
    " ug haftungsbeschrankt",
    " kgaa",
    " gmbh",
    " mbh",
    " ohg",
    " gbr",
    " ug",
    " ag",
    " kg",
    " se",
    " ev",
    " eg",
    " ltd",
    " inc",
    " llc",
    " bv",
    " sa",
];

// Transform names understood by the registry
pub const TRANSFORM_IDENTITY: &str = "identity";
pub const TRANSFORM_PREPROCESS: &str = "preprocess";
pub const TRANSFORM_ABBREVIATIONS: &str = "standardize_abbreviations";
pub const TRANSFORM_UMLAUTS: &str = "umlauts_to_english";
pub const TRANSFORM_SUFFIXES: &str = "remove_suffixes";
pub const TRANSFORM_COMMON_WORDS: &str = "remove_common_words";

/// Default step sequence as (label, transforms). Names carry forward between
/// steps, so each step only adds its own relaxation.
pub const DEFAULT_STEPS: &[(&str, &[&str])] = &[
    ("exact", &[TRANSFORM_IDENTITY]),
    ("abbreviations", &[TRANSFORM_ABBREVIATIONS]),
    ("umlauts", &[TRANSFORM_UMLAUTS]),
    ("suffixes", &[TRANSFORM_SUFFIXES]),
    ("common_words", &[TRANSFORM_COMMON_WORDS]),
];

/// Get every transform name the registry can build
pub fn supported_transforms() -> Vec<&'static str> {
    vec![
        TRANSFORM_IDENTITY,
        TRANSFORM_PREPROCESS,
        TRANSFORM_ABBREVIATIONS,
        TRANSFORM_UMLAUTS,
        TRANSFORM_SUFFIXES,
        TRANSFORM_COMMON_WORDS,
    ]
}
