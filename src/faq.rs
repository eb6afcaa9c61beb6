//! Save hooks and retrieval flow for FAQ entries.
//!
//! Saving a FAQ fans its text out to every known language; saving a
//! language fans every known FAQ into it. Retrieval serves the cached
//! list when present and falls back to the English original for any
//! FAQ without a stored translation.

use crate::cache::{faq_cache_key, Cache};
use crate::db::{Database, Faq, Language};
use crate::translator::Translator;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// One FAQ as served to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaqItem {
    pub question: String,
    pub answer: String,
}

/// Create a FAQ and translate it into every existing language.
///
/// The source-language cache entry is invalidated before the record is
/// persisted; each target language's cache entry is invalidated as its
/// translation is written. A translation-service or database failure
/// propagates and fails the write.
pub async fn create_faq(
    db: &Database,
    cache: &Cache,
    translator: &Translator,
    source_lang: &str,
    question: &str,
    answer: &str,
) -> Result<Faq> {
    cache.delete(&faq_cache_key(source_lang));

    let faq = db.insert_faq(question, answer)?;
    translate_into_all_languages(db, cache, translator, source_lang, &faq).await?;

    Ok(faq)
}

/// Update a FAQ, re-running the full translation fan-out.
///
/// Returns `None` if the id does not exist. The fan-out inserts fresh
/// translation rows without touching existing ones, so repeated saves
/// accumulate duplicates for each language; retrieval picks the oldest
/// row per pair (known issue, kept as-is).
pub async fn update_faq(
    db: &Database,
    cache: &Cache,
    translator: &Translator,
    source_lang: &str,
    id: i64,
    question: &str,
    answer: &str,
) -> Result<Option<Faq>> {
    cache.delete(&faq_cache_key(source_lang));

    let faq = match db.update_faq(id, question, answer)? {
        Some(faq) => faq,
        None => return Ok(None),
    };
    translate_into_all_languages(db, cache, translator, source_lang, &faq).await?;

    Ok(Some(faq))
}

async fn translate_into_all_languages(
    db: &Database,
    cache: &Cache,
    translator: &Translator,
    source_lang: &str,
    faq: &Faq,
) -> Result<()> {
    let languages = db.list_languages()?;
    info!(
        faq_id = faq.id,
        languages = languages.len(),
        "Translating FAQ into all languages"
    );

    for language in languages {
        cache.delete(&faq_cache_key(&language.code));

        let question = translator
            .translate(&faq.question, source_lang, &language.code)
            .await
            .context(format!("Failed to translate question to {}", language.code))?;
        let answer = translator
            .translate(&faq.answer, source_lang, &language.code)
            .await
            .context(format!("Failed to translate answer to {}", language.code))?;

        db.insert_translation(faq.id, language.id, &question, &answer)?;
    }

    Ok(())
}

/// Create a language and translate every existing FAQ into it.
///
/// Unlike the FAQ hook this does not invalidate any cache entries;
/// stale per-language lists stay cached until a FAQ save clears them.
pub async fn create_language(
    db: &Database,
    translator: &Translator,
    source_lang: &str,
    code: &str,
) -> Result<Language> {
    let language = db.insert_language(code)?;

    let faqs = db.list_faqs()?;
    info!(
        code = %language.code,
        faqs = faqs.len(),
        "Translating all FAQs into new language"
    );

    for faq in faqs {
        let question = translator
            .translate(&faq.question, source_lang, &language.code)
            .await
            .context(format!("Failed to translate question to {}", language.code))?;
        let answer = translator
            .translate(&faq.answer, source_lang, &language.code)
            .await
            .context(format!("Failed to translate answer to {}", language.code))?;

        db.insert_translation(faq.id, language.id, &question, &answer)?;
    }

    Ok(language)
}

/// Build the FAQ list for a language, serving and populating the cache.
///
/// Unknown codes are probed with a test translation; a valid code becomes
/// a new language on the spot (with the full fan-out of `create_language`
/// as a side effect of the read), while any probe failure is swallowed
/// and the English originals are served instead.
pub async fn list_faqs_for_language(
    db: &Database,
    cache: &Cache,
    translator: &Translator,
    source_lang: &str,
    lang_code: &str,
) -> Result<Vec<FaqItem>> {
    if lang_code == source_lang || lang_code.is_empty() {
        let key = faq_cache_key(source_lang);
        if let Some(cached) = cache.get(&key) {
            debug!(lang = source_lang, "Serving FAQ list from cache");
            return serde_json::from_str(&cached).context("Failed to parse cached FAQ list");
        }

        let items: Vec<FaqItem> = db
            .list_faqs()?
            .into_iter()
            .map(|faq| FaqItem {
                question: faq.question,
                answer: faq.answer,
            })
            .collect();

        let serialized = serde_json::to_string(&items).context("Failed to serialize FAQ list")?;
        cache.set(&key, serialized, None);
        return Ok(items);
    }

    let language = match db.get_language_by_code(lang_code)? {
        Some(language) => Some(language),
        None => {
            // Probe the translator to validate the code; any failure means
            // the FAQs are served untranslated, without surfacing an error.
            match probe_and_create_language(db, translator, source_lang, lang_code).await {
                Ok(language) => Some(language),
                Err(err) => {
                    warn!(code = lang_code, error = %format!("{err:#}"), "Language probe failed");
                    None
                }
            }
        }
    };

    let key = faq_cache_key(lang_code);
    if let Some(cached) = cache.get(&key) {
        debug!(lang = lang_code, "Serving FAQ list from cache");
        return serde_json::from_str(&cached).context("Failed to parse cached FAQ list");
    }

    let faqs = db.list_faqs()?;
    let mut items = Vec::with_capacity(faqs.len());

    for faq in faqs {
        let translation = match &language {
            Some(language) => db.find_translation(faq.id, language.id)?,
            None => None,
        };

        items.push(match translation {
            Some(translation) => FaqItem {
                question: translation.question,
                answer: translation.answer,
            },
            None => FaqItem {
                question: faq.question,
                answer: faq.answer,
            },
        });
    }

    let serialized = serde_json::to_string(&items).context("Failed to serialize FAQ list")?;
    cache.set(&key, serialized, None);

    Ok(items)
}

async fn probe_and_create_language(
    db: &Database,
    translator: &Translator,
    source_lang: &str,
    lang_code: &str,
) -> Result<Language> {
    translator
        .translate("Test", source_lang, lang_code)
        .await
        .context(format!("Probe translation to '{}' failed", lang_code))?;

    create_language(db, translator, source_lang, lang_code).await
}
