//! Image references for breeds whose table row carries none.
//!
//! References point into a public breed photo dataset laid out as one folder
//! per breed. They are built from the breed name only and never fetched.

use unicode_normalization::UnicodeNormalization;

/// Raw file host for the breed photo dataset
pub const DEFAULT_IMAGE_BASE_URL: &str =
    "https://raw.githubusercontent.com/maartenvandenbroeck/Dog-Breeds-Dataset/main";

/// Browsable tree of the same dataset
pub const DEFAULT_GALLERY_BASE_URL: &str =
    "https://github.com/maartenvandenbroeck/Dog-Breeds-Dataset/tree/main";

/// Breeds whose dataset folder does not follow the normal folding rules
const FOLDER_OVERRIDES: &[(&str, &str)] = &[
    ("Cirnechi dell\u{2019}Etna", "Cirnechi_dell_Etna"),
    ("Cirneco dell\u{2019}Etna", "Cirnechi_dell_Etna"),
    ("Chien d\u{2019}Artois", "Chien_dArtois"),
    ("St. John\u{2019}s Water Dog", "St_Johns_Water_Dog"),
];

/// Convert a breed name into its dataset folder name
///
/// Accents are stripped through NFKD decomposition, any remaining non-ASCII
/// characters and punctuation are dropped, and spaces become underscores.
pub fn breed_folder(breed: &str) -> String {
    if let Some((_, folder)) = FOLDER_OVERRIDES.iter().find(|(name, _)| *name == breed) {
        return folder.to_string();
    }

    let folded: String = breed
        .nfkd()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || c.is_ascii_whitespace())
        .collect();

    folded.trim().replace(' ', "_")
}

/// Best-guess photo URL for a breed
pub fn image_url(base_url: &str, breed: &str) -> String {
    let folder = urlencoding::encode(&breed_folder(breed)).into_owned();
    format!("{}/{folder}/{folder}_1.jpg", base_url.trim_end_matches('/'))
}

/// Link to the breed's folder for browsing more photos
pub fn gallery_url(breed: &str) -> String {
    let folder = urlencoding::encode(&breed_folder(breed)).into_owned();
    format!("{DEFAULT_GALLERY_BASE_URL}/{folder}")
}
