//! Fixed catalog of the languages the detector is built with, plus the sample
//! sentences offered through "Load Example".

use lingua::Language;
use serde::Serialize;

#[derive(Debug, Clone, Copy)]
pub struct CatalogEntry {
    pub name: &'static str,
    pub language: Language,
}

const fn entry(name: &'static str, language: Language) -> CatalogEntry {
    CatalogEntry { name, language }
}

static LANGUAGES: [CatalogEntry; 26] = [
    entry("English", Language::English),
    entry("French", Language::French),
    entry("German", Language::German),
    entry("Spanish", Language::Spanish),
    entry("Portuguese", Language::Portuguese),
    entry("Italian", Language::Italian),
    entry("Russian", Language::Russian),
    entry("Arabic", Language::Arabic),
    entry("Hindi", Language::Hindi),
    entry("Chinese", Language::Chinese),
    entry("Japanese", Language::Japanese),
    entry("Korean", Language::Korean),
    entry("Vietnamese", Language::Vietnamese),
    entry("Thai", Language::Thai),
    entry("Dutch", Language::Dutch),
    entry("Greek", Language::Greek),
    entry("Turkish", Language::Turkish),
    entry("Polish", Language::Polish),
    entry("Danish", Language::Danish),
    entry("Finnish", Language::Finnish),
    entry("Hungarian", Language::Hungarian),
    entry("Swedish", Language::Swedish),
    entry("Indonesian", Language::Indonesian),
    entry("Romanian", Language::Romanian),
    entry("Bengali", Language::Bengali),
    entry("Persian", Language::Persian),
];

/// Display name -> classifier identifier, in catalog order.
pub fn all_languages() -> &'static [CatalogEntry] {
    &LANGUAGES
}

pub fn language_ids() -> Vec<Language> {
    all_languages().iter().map(|entry| entry.language).collect()
}

pub fn display_name(language: Language) -> Option<&'static str> {
    all_languages()
        .iter()
        .find(|entry| entry.language == language)
        .map(|entry| entry.name)
}

/// Catalog names sorted alphabetically, for the "Supported Languages" panel.
pub fn supported_language_names() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = all_languages().iter().map(|entry| entry.name).collect();
    names.sort_unstable();
    names
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleText {
    pub language: &'static str,
    pub text: &'static str,
}

static SAMPLES: [SampleText; 10] = [
    SampleText {
        language: "English",
        text: "Hello! How are you doing today? I hope you're having a wonderful day filled with joy and happiness.",
    },
    SampleText {
        language: "French",
        text: "Bonjour! Comment allez-vous aujourd'hui? J'espère que vous passez une merveilleuse journée remplie de joie et de bonheur.",
    },
    SampleText {
        language: "Spanish",
        text: "¡Hola! ¿Cómo estás hoy? Espero que estés teniendo un día maravilloso lleno de alegría y felicidad.",
    },
    SampleText {
        language: "German",
        text: "Hallo! Wie geht es dir heute? Ich hoffe, du hast einen wunderbaren Tag voller Freude und Glück.",
    },
    SampleText {
        language: "Italian",
        text: "Ciao! Come stai oggi? Spero che tu stia passando una giornata meravigliosa piena di gioia e felicità.",
    },
    SampleText {
        language: "Russian",
        text: "Привет! Как ты сегодня? Надеюсь, у тебя прекрасный день, полный радости и счастья.",
    },
    SampleText {
        language: "Japanese",
        text: "こんにちは！今日の調子はどうですか？喜びと幸せに満ちた素晴らしい一日をお過ごしください。",
    },
    SampleText {
        language: "Chinese",
        text: "你好！今天好吗？希望你度过充满欢乐和幸福的美好一天。",
    },
    SampleText {
        language: "Arabic",
        text: "مرحبا! كيف حالك اليوم؟ أتمنى أن تقضي يومًا رائعًا مليئًا بالفرح والسعادة.",
    },
    SampleText {
        language: "Hindi",
        text: "नमस्ते! आज आप कैसे हैं? मुझे आशा है कि आपका दिन खुशी और आनंद से भरा हो।",
    },
];

pub fn sample_texts() -> &'static [SampleText] {
    &SAMPLES
}

pub fn sample_text(language: &str) -> Option<&'static str> {
    SAMPLES
        .iter()
        .find(|sample| sample.language == language)
        .map(|sample| sample.text)
}
