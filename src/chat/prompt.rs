use super::types::{ChatMessage, ProviderMessage, ProviderRole};

// ---------------------------------------------------------------------------
// System prompt
// ---------------------------------------------------------------------------

pub const SYSTEM_PROMPT: &str = "Anda adalah asisten virtual yang berpengetahuan luas tentang Kota Malang, Indonesia. \
Jawab pertanyaan dengan singkat, akurat, dan relevan dengan konteks Malang. \
Prioritaskan informasi tentang destinasi wisata, kuliner khas, rute transportasi, dan layanan publik di Malang. \
Jika pertanyaan di luar konteks Malang atau Anda tidak yakin dengan jawabannya, katakan saja Anda tidak tahu.";

/// Canned model turn that follows the instruction turn.
pub const ACKNOWLEDGEMENT: &str =
    "Baik, saya mengerti. Saya siap membantu dengan informasi seputar Kota Malang.";

pub const DEFAULT_CITY: &str = "Malang";

/// Number of synthetic turns placed before the real history.
pub const PRIMING_TURNS: usize = 2;

/// System prompt with the city focus appended.
pub fn instruction_for(city: &str) -> String {
    format!("{SYSTEM_PROMPT}\n\nFokus percakapan ini hanya untuk kota: {city}.")
}

/// Build the provider-native turn list: priming turns, then history in order.
///
/// `system` messages are dropped since the instruction turn already carries
/// the system prompt.
pub fn build_contents(city: &str, messages: &[ChatMessage]) -> Vec<ProviderMessage> {
    let mut contents = Vec::with_capacity(PRIMING_TURNS + messages.len());
    contents.push(ProviderMessage::text(ProviderRole::User, instruction_for(city)));
    contents.push(ProviderMessage::text(ProviderRole::Model, ACKNOWLEDGEMENT));

    contents.extend(messages.iter().filter_map(|m| {
        m.role
            .to_provider()
            .map(|role| ProviderMessage::text(role, m.content.clone()))
    }));
    contents
}
