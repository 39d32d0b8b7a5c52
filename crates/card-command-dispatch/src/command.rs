//! Command language.
//!
//! A message is a command only when it starts with `!`. The first token picks
//! the intent: `addcarta` and `attcarta` mutate, anything else is a lookup of
//! that token.

/// Marks a message as a command.
pub const COMMAND_PREFIX: char = '!';

pub const INSERT_INTENT: &str = "addcarta";
pub const UPDATE_INTENT: &str = "attcarta";

/// Number of positional fields a mutating command carries.
pub const FIELD_COUNT: usize = 7;

/// Which write a mutating command performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    Insert,
    Update,
}

/// Positional fields of a mutating command, as typed by the sender.
///
/// Missing and empty tokens are `None`. Numeric fields are already coerced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardArgs {
    pub name_pt: Option<String>,
    pub name_en: Option<String>,
    pub cost: Option<i64>,
    pub power: Option<i64>,
    pub ability: Option<String>,
    pub availability: Option<String>,
    pub image_url: Option<String>,
}

/// A recognized command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Look a card up by PT or EN name. The name may be empty.
    Lookup(String),
    Mutate { kind: MutationKind, args: CardArgs },
}

impl Command {
    pub fn is_mutating(&self) -> bool {
        matches!(self, Command::Mutate { .. })
    }
}

/// Parse message text. Returns `None` for anything that is not a command.
pub fn parse(text: &str) -> Option<Command> {
    let rest = text.strip_prefix(COMMAND_PREFIX)?;
    let mut tokens = rest.trim().split(' ');
    let intent = tokens.next().unwrap_or_default();

    let kind = match intent {
        INSERT_INTENT => MutationKind::Insert,
        UPDATE_INTENT => MutationKind::Update,
        _ => return Some(Command::Lookup(intent.to_string())),
    };

    let mut fields: Vec<Option<&str>> = tokens
        .take(FIELD_COUNT)
        .map(|t| Some(t).filter(|t| !t.is_empty()))
        .collect();
    fields.resize(FIELD_COUNT, None);

    let text_at = |i: usize| fields[i].map(str::to_string);
    let args = CardArgs {
        name_pt: text_at(0),
        name_en: text_at(1),
        cost: fields[2].and_then(parse_int),
        power: fields[3].and_then(parse_int),
        ability: text_at(4),
        availability: text_at(5),
        image_url: text_at(6),
    };

    Some(Command::Mutate { kind, args })
}

/// Lenient integer coercion: optional sign, then the leading digits.
///
/// `"3abc"` is 3; no leading digits or overflow yields `None`.
pub fn parse_int(token: &str) -> Option<i64> {
    let token = token.trim_start();
    let (sign, digits) = match token.as_bytes().first() {
        Some(b'-') => ("-", &token[1..]),
        Some(b'+') => ("", &token[1..]),
        _ => ("", token),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    format!("{sign}{}", &digits[..end]).parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mutate_args(text: &str) -> (MutationKind, CardArgs) {
        match parse(text) {
            Some(Command::Mutate { kind, args }) => (kind, args),
            other => panic!("expected a mutating command, got {other:?}"),
        }
    }

    #[test]
    fn test_text_without_prefix_is_not_a_command() {
        assert_eq!(parse("Spider-Man"), None);
        assert_eq!(parse(" !Spider-Man"), None);
        assert_eq!(parse(""), None);
    }

    #[test]
    fn test_lookup_uses_first_token_only() {
        assert_eq!(
            parse("!Spider-Man"),
            Some(Command::Lookup("Spider-Man".to_string()))
        );
        assert_eq!(
            parse("!Homem de Ferro"),
            Some(Command::Lookup("Homem".to_string()))
        );
        assert_eq!(
            parse("!  Hulk  "),
            Some(Command::Lookup("Hulk".to_string()))
        );
    }

    #[test]
    fn test_bare_prefix_is_empty_lookup() {
        assert_eq!(parse("!"), Some(Command::Lookup(String::new())));
    }

    #[test]
    fn test_intent_is_case_sensitive() {
        assert_eq!(
            parse("!AddCarta X"),
            Some(Command::Lookup("AddCarta".to_string()))
        );
    }

    #[test]
    fn test_full_insert_command() {
        let (kind, args) =
            mutate_args("!addcarta Homem-Aranha Spider-Man 2 3 \"Swing\" Comum url.png");

        assert_eq!(kind, MutationKind::Insert);
        assert_eq!(args.name_pt.as_deref(), Some("Homem-Aranha"));
        assert_eq!(args.name_en.as_deref(), Some("Spider-Man"));
        assert_eq!(args.cost, Some(2));
        assert_eq!(args.power, Some(3));
        assert_eq!(args.ability.as_deref(), Some("\"Swing\""));
        assert_eq!(args.availability.as_deref(), Some("Comum"));
        assert_eq!(args.image_url.as_deref(), Some("url.png"));
    }

    #[test]
    fn test_short_update_fills_missing_fields() {
        let (kind, args) = mutate_args("!attcarta Thor Thor 4");

        assert_eq!(kind, MutationKind::Update);
        assert_eq!(args.name_pt.as_deref(), Some("Thor"));
        assert_eq!(args.cost, Some(4));
        assert_eq!(args.power, None);
        assert_eq!(args.ability, None);
        assert_eq!(args.image_url, None);
    }

    #[test]
    fn test_mutation_without_fields_has_no_key() {
        let (_, args) = mutate_args("!addcarta");
        assert_eq!(args, CardArgs::default());
    }

    #[test]
    fn test_double_space_yields_empty_positional_field() {
        let (_, args) = mutate_args("!addcarta Thor  1 2");

        assert_eq!(args.name_pt.as_deref(), Some("Thor"));
        assert_eq!(args.name_en, None);
        assert_eq!(args.cost, Some(1));
        assert_eq!(args.power, Some(2));
    }

    #[test]
    fn test_tokens_past_the_seventh_are_ignored() {
        let (_, args) = mutate_args("!addcarta a b 1 2 c d e extra words");
        assert_eq!(args.image_url.as_deref(), Some("e"));
    }

    #[test]
    fn test_parse_int_is_lenient() {
        assert_eq!(parse_int("3"), Some(3));
        assert_eq!(parse_int("3abc"), Some(3));
        assert_eq!(parse_int("-2"), Some(-2));
        assert_eq!(parse_int("+7"), Some(7));
        assert_eq!(parse_int("abc"), None);
        assert_eq!(parse_int(""), None);
        assert_eq!(parse_int("-"), None);
        assert_eq!(parse_int("99999999999999999999"), None);
    }
}
