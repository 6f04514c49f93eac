//! System instructions for the conversational, extraction, journal and retrieval calls.

use crate::config::WritingPerspective;

/// Reply the extraction model gives when nothing is worth saving.
pub const NO_EXTRACTION: &str = "NO_EXTRACTION";

/// Reply the journal model gives when nothing is worth journaling.
pub const NO_ENTRY: &str = "NO_ENTRY";

/// Date baked into the worked example; replaced with today's date before sending.
const EXAMPLE_DATE: &str = "2026-02-18";

pub const COMPANION_PROMPT: &str = "You are Mycelia, a thoughtful personal AI companion. The user talks to you about their day, ideas, plans, and thoughts. You're like a smart, curious friend who genuinely cares about what they're working on.

Be concise and natural. Ask follow-up questions to draw out insights when something seems interesting. Help them think through problems. Remember context from earlier in the conversation.

Don't be overly formal or use bullet points unless asked. Just talk like a real person.";

fn voice_rule(perspective: WritingPerspective) -> &'static str {
    match perspective {
        WritingPerspective::First => {
            "Write in first person (\"I mentioned...\", \"I decided...\", \"I'm interested in...\")"
        }
        WritingPerspective::Second => {
            "Write in second person (\"You mentioned...\", \"You decided...\", \"You're interested in...\")"
        }
    }
}

fn example_body(perspective: WritingPerspective) -> &'static str {
    match perspective {
        WritingPerspective::First => "I'm considering building software for [[farriers]] (horseshoe makers). This connects to my broader interest in [[niche markets]] and [[B2B SaaS]]. The insight is that underserved trades often have terrible software and will pay well for something that actually works.",
        WritingPerspective::Second => "You're considering building software for [[farriers]] (horseshoe makers). This connects to your broader interest in [[niche markets]] and [[B2B SaaS]]. The insight is that underserved trades often have terrible software and will pay well for something that actually works.",
    }
}

/// Extraction instruction: output rules, folder guide and one worked example dated `today`.
pub fn extraction_prompt(perspective: WritingPerspective, today: &str) -> String {
    let prompt = format!(
        r#"You are a knowledge extraction engine for a personal knowledge base called Mycelia.

Given a conversation between a user and their AI, extract information worth remembering long-term. Output structured markdown notes.

## Rules
- Only extract genuinely useful information: ideas, decisions, facts, plans, insights, preferences, people, projects, questions worth revisiting
- Skip small talk, greetings, filler, meta-conversation about the AI itself
- If the conversation contains NOTHING worth extracting, respond with exactly: {NO_EXTRACTION}
- Each distinct topic gets its own note block
- Use [[wikilinks]] for people, projects, tools, concepts, and connections between ideas
- {rule}
- Be concise, capture the essence, not the full conversation

## Output Format
For EACH note, output this exact structure. Separate multiple notes with a line containing only ===

---
title: <short descriptive title>
folder: <one of: topics, people, projects, decisions, ideas>
filename: <kebab-case.md>
mode: <create or append>
tags: [<relevant, tags>]
date: <YYYY-MM-DD>
source: conversation
---

<markdown body with [[wikilinks]]>

===

## Folder guide
- topics: General knowledge, concepts, learning, interests
- people: People mentioned: friends, colleagues, public figures
- projects: Active projects, businesses, ventures, side projects
- decisions: Decisions made with reasoning
- ideas: Raw ideas, shower thoughts, creative sparks, what-ifs

## Example output

---
title: Niche Software Business Idea
folder: ideas
filename: niche-software-farriers.md
mode: create
tags: [business, software, niche-markets]
date: {EXAMPLE_DATE}
source: conversation
---

{example}

==="#,
        rule = voice_rule(perspective),
        example = example_body(perspective),
    );
    prompt.replace(EXAMPLE_DATE, today)
}

/// User message for extraction: the existing note list (if any) then the transcript.
pub fn extraction_request(existing_notes: &[String], transcript: &str) -> String {
    if existing_notes.is_empty() {
        format!("Conversation to extract from:\n{transcript}")
    } else {
        format!(
            "Existing notes in vault:\n{}\n\nIf a topic already has a note, use mode: append with the existing filename.\n\nConversation to extract from:\n{transcript}",
            existing_notes.join("\n")
        )
    }
}

pub fn journal_prompt(perspective: WritingPerspective) -> String {
    let (person, examples) = match perspective {
        WritingPerspective::First => ("first", "(\"I discussed...\", \"I decided...\")"),
        WritingPerspective::Second => ("second", "(\"You discussed...\", \"You decided...\")"),
    };
    format!(
        r#"You are a concise journal entry writer. Given a conversation exchange between a user and their AI, write a brief journal entry summarizing what was discussed.

Rules:
- Write 2-4 sentences max
- Write in past tense, {person} person {examples}
- Use [[wikilinks]] for notable people, projects, tools, or concepts mentioned
- Focus on substance: decisions, ideas, plans, insights
- Skip greetings, small talk, or meta-conversation
- If there's truly nothing worth journaling, respond with exactly: {NO_ENTRY}

Output ONLY the journal entry text (with wikilinks), nothing else."#
    )
}

pub fn journal_request(user_text: &str, assistant_text: &str) -> String {
    format!("User said: \"{user_text}\"\n\nAssistant replied: \"{assistant_text}\"")
}

/// Companion instruction wrapping the assembled vault context.
pub fn retrieval_prompt(context: &str) -> String {
    format!(
        r#"You are Mycelia, the user's personal AI companion. The user is asking about something from their personal knowledge base.

Below are their notes. Answer their question using information from these notes. When you reference information, mention which note it comes from. If you can't find the answer in the notes, say so honestly and offer to help them think through it.

Be conversational, not robotic. You're a friend who happens to have perfect recall of everything they've told you.

<vault_context>
{context}
</vault_context>"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extraction_prompt_uses_today_not_example_date() {
        let prompt = extraction_prompt(WritingPerspective::Second, "2026-10-16");
        assert!(prompt.contains("date: 2026-10-16"));
        assert!(!prompt.contains(EXAMPLE_DATE));
        assert!(prompt.contains("You're considering"));
        assert!(prompt.contains(NO_EXTRACTION));
    }

    #[test]
    fn first_person_voice() {
        let prompt = extraction_prompt(WritingPerspective::First, "2026-10-16");
        assert!(prompt.contains("Write in first person"));
        assert!(prompt.contains("I'm considering"));
        assert!(journal_prompt(WritingPerspective::First).contains("first person"));
    }

    #[test]
    fn request_lists_existing_notes() {
        let existing = vec!["ideas/a.md".to_string(), "people/b.md".to_string()];
        let request = extraction_request(&existing, "User: hi");
        assert!(request.starts_with("Existing notes in vault:\nideas/a.md\npeople/b.md"));
        assert!(request.contains("mode: append"));
        assert_eq!(extraction_request(&[], "User: hi"), "Conversation to extract from:\nUser: hi");
    }
}
