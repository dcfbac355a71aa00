use hl_core::Article;
use std::fmt::Write;

pub fn system_prompt(target_language: &str) -> String {
    format!(
        "You are a senior financial news editor writing for retail investors. \
         You write in {target_language}. You answer with JSON only, never with prose around it."
    )
}

/// One prompt for the whole batch; the answer must keep the article order.
pub fn batch_prompt(articles: &[Article], target_language: &str) -> String {
    let count = articles.len();
    let mut prompt = format!(
        "Rewrite the following {count} business news items in {target_language}.\n\
         For each item produce:\n\
         - \"title\": a concise headline\n\
         - \"summary\": two or three sentences on what happened\n\
         - \"commentary\": one or two sentences of investment commentary \
           (market impact, affected sectors, risks)\n\
         - \"category\": a short sector label\n\
         Return a JSON array of exactly {count} objects with those keys, \
         in the same order as the items below.\n\n"
    );

    for (i, article) in articles.iter().enumerate() {
        // writing into a String cannot fail
        let _ = write!(
            prompt,
            "Item {}\nTitle: {}\nDescription: {}\nSource: {}\n\n",
            i + 1,
            article.title,
            article.description,
            article.source
        );
    }

    prompt
}
