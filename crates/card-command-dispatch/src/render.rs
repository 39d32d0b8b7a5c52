//! Reply texts sent back to the chat.

use card_catalog_database::CardRecord;
use std::fmt::Display;

pub const NOT_FOUND: &str = "Carta não encontrada!";
pub const INSERTED: &str = "Carta adicionada com sucesso!";
pub const UPDATED: &str = "Carta atualizada com sucesso!";
pub const INSERT_DENIED: &str = "Você não está autorizado a adicionar cartas!";
pub const UPDATE_DENIED: &str = "Você não está autorizado a atualizar cartas!";

/// Placeholder for a field the record does not have.
const ABSENT: &str = "-";

/// Render a record, one labelled field per line in a fixed order.
pub fn render_card(card: &CardRecord) -> String {
    [
        format!("Nome PT: {}", card.name_pt),
        format!("Nome EN: {}", or_absent(card.name_en.as_ref())),
        format!("Custo: {}", or_absent(card.cost.as_ref())),
        format!("Poder: {}", or_absent(card.power.as_ref())),
        format!("Habilidade: {}", or_absent(card.ability.as_ref())),
        format!("Disponibilidade: {}", or_absent(card.availability.as_ref())),
        format!("Imagem: {}", or_absent(card.image_url.as_ref())),
    ]
    .join("\n")
}

/// Reply for a failed write. The error text is shown verbatim.
pub fn write_error(error: &impl Display) -> String {
    format!("Erro: {error}")
}

fn or_absent<T: Display>(value: Option<&T>) -> String {
    value.map_or_else(|| ABSENT.to_string(), ToString::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn card() -> CardRecord {
        CardRecord {
            name_pt: "Homem-Aranha".to_string(),
            name_en: Some("Spider-Man".to_string()),
            cost: Some(2),
            power: Some(3),
            ability: Some("Swing".to_string()),
            availability: Some("Comum".to_string()),
            image_url: Some("url.png".to_string()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_render_full_card() {
        assert_eq!(
            render_card(&card()),
            "Nome PT: Homem-Aranha\n\
             Nome EN: Spider-Man\n\
             Custo: 2\n\
             Poder: 3\n\
             Habilidade: Swing\n\
             Disponibilidade: Comum\n\
             Imagem: url.png"
        );
    }

    #[test]
    fn test_render_absent_fields_as_dash() {
        let mut sparse = card();
        sparse.name_en = None;
        sparse.cost = None;
        sparse.image_url = None;

        let text = render_card(&sparse);
        assert!(text.contains("Nome EN: -\n"));
        assert!(text.contains("Custo: -\n"));
        assert!(text.ends_with("Imagem: -"));
        assert!(text.contains("Poder: 3\n"));
    }

    #[test]
    fn test_write_error_prefix() {
        assert_eq!(write_error(&"boom"), "Erro: boom");
    }
}
