use super::ChatMessage;
use crate::models::alert::Alert;

const COACH_SYSTEM: &str = "Du bist ein freundlicher, sachlicher Gesundheitscoach. \
Antworte auf Deutsch, konkret und motivierend. Du stellst keine Diagnosen und \
empfiehlst bei ernsthaften Beschwerden ärztlichen Rat.";

pub fn plan(summary: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(COACH_SYSTEM),
        ChatMessage::user(format!(
            "Erstelle einen Wochenplan (Bewegung, Ernährung, Schlaf) für folgende Person. \
             Gliedere ihn nach Wochentagen und halte jeden Tag kurz.\n\n{}",
            summary
        )),
    ]
}

pub fn coach(summary: &str, message: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(format!(
            "{}\n\nAktuelle Gesundheitsdaten der Person:\n{}",
            COACH_SYSTEM, summary
        )),
        ChatMessage::user(message.trim()),
    ]
}

pub fn explain_alerts(summary: &str, alerts: &[Alert]) -> Vec<ChatMessage> {
    let list = alerts
        .iter()
        .map(|a| format!("- [{}] {}", a.severity, a.message))
        .collect::<Vec<_>>()
        .join("\n");
    vec![
        ChatMessage::system(COACH_SYSTEM),
        ChatMessage::user(format!(
            "Erkläre der Person in wenigen Sätzen, was diese Warnungen bedeuten \
             und was sie konkret tun kann.\n\nWarnungen:\n{}\n\nDaten:\n{}",
            list, summary
        )),
    ]
}

pub const IMAGE_ANALYSIS: &str = "Analysiere das Foto dieser Mahlzeit. Nenne die erkennbaren \
Lebensmittel und schätze Kalorien sowie Makronährstoffe. Antworte zuerst mit einer Zeile JSON \
der Form {\"calories\": Zahl, \"protein_g\": Zahl, \"carbs_g\": Zahl, \"fat_g\": Zahl} und \
danach mit einer kurzen Einschätzung auf Deutsch.";
