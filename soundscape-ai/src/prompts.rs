//! Prompt builders
//!
//! Every prompt asks for bare JSON. Answers are still parsed defensively by
//! [`crate::llm::structured`], since the model does not always comply.

use crate::models::Sound;

/// Message returned with an invalid verdict
pub const INVALID_INPUT_MESSAGE: &str = "Your input does not seem to describe a soundscape.";

/// Example inputs offered when a query is rejected
pub const SUGGESTIONS: [&str; 5] = [
    "forest with birds and a stream",
    "busy cafe with people talking",
    "thunderstorm at night",
    "ocean waves on a beach",
    "spaceship engine room humming",
];

/// Styles for style-seeded keyword generation
pub const STYLES: [&str; 18] = [
    "lo-fi",
    "jazzy",
    "cinematic",
    "upbeat",
    "classical",
    "ambient",
    "melancholic piano",
    "folk acoustic",
    "grunge",
    "funky",
    "orchestral",
    "violin",
    "angelic",
    "serene",
    "uplifting",
    "forest sounds",
    "sunset vibes",
    "midnight jazz",
];

/// Name used in prompts for a record without one
pub const UNNAMED_SOUND: &str = "Unnamed Sound";

const NO_DESCRIPTION: &str = "No description";

/// Product facts the chat assistant answers from
pub const CHAT_KNOWLEDGE: &str = "\
SoundscapeGen turns a short description of a place, mood or scene into a layered soundscape.
- Type a description such as \"rainy night in Tokyo\" or just \"river\". The assistant extracts \
sound keywords from it and searches the Freesound library for matching clips.
- Each keyword contributes a few clips. Every clip gets a short descriptive track name.
- The mixer plays all tracks together. Each channel has its own volume, mute and solo controls, \
and a master channel controls the overall level.
- An illustrative image and a short paragraph describing the blended soundscape are generated for every soundscape.
- \"Surprise me\" picks a random style (for example lo-fi, cinematic or midnight jazz) and builds keywords from it.
- Inputs unrelated to sound, such as math problems or general trivia questions, are rejected with example suggestions.
- Signed-in users can save soundscapes and revisit them later. Popular soundscapes are listed on the home page.
- Sounds come from Freesound and keep their original Creative Commons licenses.";

/// Topical-relevance check; the answer is `{"is_valid": bool, "reason"?: string}`
pub fn validation_prompt(user_text: &str) -> String {
    format!(
        r#"You are a sound-related input validator. Determine if the following input is even remotely about sound, an audio environment, or if it could reasonably describe or inspire one.

Input: "{user_text}"

Be extremely lenient: accept vague or short inputs like "river", "library", "give me soundscape for ocean", "sounds of wind", "rain".
Also accept inputs that describe sensory, emotional, or imaginative experiences that could be translated into sound, such as "floating in space", "dreaming underwater", "being alone in a quiet room", "walking through a forest".
Assume that if the input mentions a thing, place, situation, or sensory experience, it is likely asking for sound.

Reject only clearly irrelevant inputs like questions unrelated to sound, programming help, math problems, essays, or personal facts.
For example, reject inputs like: "what is the capital of France", "solve this equation", "write an essay on the Cold War", "how does photosynthesis work?", "I have two siblings", "1333647##//0", or "how to code in Python".

Respond with ONLY a JSON object:
{{"is_valid": true}} if the input could relate to soundscapes or audio environments
{{"is_valid": false, "reason": "<one short sentence>"}} if it is clearly unrelated to sound

Return ONLY the JSON. No explanation or extra text."#
    )
}

/// Expand a description into exactly `count` sound-search keywords
pub fn keyword_prompt(user_text: &str, count: usize) -> String {
    format!(
        r#"You are a sound design keyword generator. You will be given a sentence or description, short, long, or creatively written, about what the user wants to hear. Identify the noun, verb, or adjective elements that describe sound-related content.

Understand the context and intent behind the input, whether it is a literal description (e.g. "birds chirping") or an imaginative scene (e.g. "a peaceful morning in the forest").

Identify the specific things that make sounds (people, animals, environments, weather, instruments, machines) and any descriptive modifiers of how they sound (softly, distant, echoing).

Ignore words that do not describe sound directly, such as pronouns, filler phrases, or requests ("I would like to hear..."). Focus only on what the user is trying to hear or imagine hearing.

Description: "{user_text}"

If the description is simple (a single word such as "river", "cafe", "ocean"), expand it into multiple related sound keywords instead of repeating it.
For example:
- For "river": ["flowing water", "river current", "stream bubbling", "water splash", "gentle brook", "river ambience"]
- For "cafe": ["coffee shop ambience", "people chatting", "coffee machine", "cup clinking", "cafe background", "restaurant noise"]

Generate exactly {count} keywords related to the sounds described. Format your response as ONLY a JSON array of strings.
For example: ["spaceship hum", "engine rumble", "space atmosphere", "control panel beeps", "airlock sound", "cosmic radiation"]

Important: Return ONLY the JSON array, no other text or explanation."#
    )
}

/// Keywords inspired by a style or mood
pub fn style_keywords_prompt(style: &str, count: usize) -> String {
    format!(
        r#"You are a creative sound designer. The selected style is "{style}".

Generate exactly {count} sound-relevant keywords that match or are inspired by this style.
These will be used to search a sound database, so be descriptive, musical, and creative.

Avoid repeating the style name in every keyword. Think of instruments, moods, textures, ambiences, or audio scenes that fit.

Return ONLY a JSON array of strings. No other text or explanation.
For example: ["vinyl crackle", "smooth saxophone", "cafe chatter", "soft rain", "bass groove", "city night ambience"]"#
    )
}

/// Truncate to `max_chars` characters, appending "..." when cut
pub fn truncate_description(description: &str, max_chars: usize) -> String {
    if description.chars().count() <= max_chars {
        return description.to_string();
    }
    let mut truncated: String = description.chars().take(max_chars).collect();
    truncated.push_str("...");
    truncated
}

/// One batched naming prompt listing every record by position
pub fn track_names_prompt(sounds: &[Sound], description_max_chars: usize) -> String {
    let records = sounds
        .iter()
        .enumerate()
        .map(|(idx, sound)| {
            let name = sound.name.as_deref().unwrap_or(UNNAMED_SOUND);
            let description = truncate_description(
                sound.description.as_deref().unwrap_or(NO_DESCRIPTION),
                description_max_chars,
            );
            format!(
                "Sound {}:\nName: \"{}\"\nDescription: \"{}\"",
                idx + 1,
                name,
                description
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        r#"You are a sound naming expert. Give each sound below a short, descriptive name (2-4 words) that clearly describes what the sound is.

The names should be concise, concrete, and focused on what the sound actually is (not poetic or abstract).
Ignore irrelevant details in the description.

Make sure each name is unique even if the sounds have similar descriptions.

{records}

Format your response as a JSON array of exactly {count} strings containing ONLY the new names, in the same order as the sounds above.
For example: ["Wind Through Pines", "Ocean Waves Crashing", "Distant Thunder", "City Traffic"]

IMPORTANT: Return ONLY the JSON array, no other text or explanation."#,
        count = sounds.len()
    )
}

/// Evocative paragraph from comma-joined track names
pub fn description_prompt(track_names: &str) -> String {
    format!(
        r#"You are a specialized description generator. The user has provided the names of all tracks in a soundscape, separated by commas: "{track_names}"

Write a single paragraph (3-4 sentences) describing how this blended soundscape could sound.
Mention some detailed sounds and explain how they merge or complement one another. Keep the style concise.

Return ONLY a valid JSON object with one key, "description", holding the paragraph.
Example:
{{"description": "This blended soundscape transports listeners to the edge of a vast ocean, where the rhythmic crash of waves creates a steady, soothing pulse. Gusts of wind add depth and motion, while distant gulls punctuate the scene. Together they form an immersive coastal atmosphere."}}

Return ONLY valid JSON, with no extra text, code fences, or disclaimers."#
    )
}

/// Product assistant prompt grounded in [`CHAT_KNOWLEDGE`]
pub fn chat_prompt(question: &str) -> String {
    format!(
        r#"You are the SoundscapeGen assistant. Answer the user's question briefly and helpfully using only the product information below. If the answer is not covered, say so and suggest what the user can try in the app.

Product information:
{CHAT_KNOWLEDGE}

User question: "{question}"

Respond with ONLY a JSON object with one key, "response", holding your answer as plain text.
Example: {{"response": "Type a description like \"rainy forest\" and press Generate."}}"#
    )
}
