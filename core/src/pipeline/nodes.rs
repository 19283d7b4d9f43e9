//! Graph nodes: each node is a single chat exchange

use crate::llm::{ChatMessage, ChatModel};
use crate::Result;

const TITLE_SYSTEM: &str = "You are an expert blog writer. You write concise, \
engaging blog titles. Respond with the title text only, no quotes, no markdown.";

const CONTENT_SYSTEM: &str = "You are an expert blog writer. You write detailed, \
well-structured blog posts in markdown with headings and short paragraphs. \
Respond with the post body only.";

const TRANSLATE_SYSTEM: &str = "You are a professional translator. Translate the \
user's text faithfully, preserving markdown structure. Respond with the \
translation only.";

pub(super) async fn title(llm: &dyn ChatModel, topic: &str) -> Result<String> {
    let messages = [
        ChatMessage::system(TITLE_SYSTEM),
        ChatMessage::user(format!("Write one blog title about: {topic}")),
    ];
    Ok(llm.chat(&messages).await?.trim().to_string())
}

pub(super) async fn content(llm: &dyn ChatModel, topic: &str, title: &str) -> Result<String> {
    let messages = [
        ChatMessage::system(CONTENT_SYSTEM),
        ChatMessage::user(format!(
            "Write a blog post titled \"{title}\" about: {topic}"
        )),
    ];
    Ok(llm.chat(&messages).await?.trim().to_string())
}

pub(super) async fn translate(llm: &dyn ChatModel, language: &str, text: &str) -> Result<String> {
    let messages = [
        ChatMessage::system(TRANSLATE_SYSTEM),
        ChatMessage::user(format!("Translate into {language}:\n\n{text}")),
    ];
    Ok(llm.chat(&messages).await?.trim().to_string())
}
