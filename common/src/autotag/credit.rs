use base::setting::Import;

use crate::fetch::musicbrainz::{Alias, ArtistCredit};

/// One piece of an artist credit, in the order it is displayed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CreditElement<'a> {
    Artist(&'a ArtistCredit),
    JoinPhrase(&'a str),
}

/// Splits the raw credit list into artists and the join phrases following them.
pub fn credit_elements(credit: &[ArtistCredit]) -> Vec<CreditElement<'_>> {
    let mut elements = Vec::with_capacity(credit.len() * 2);
    for ac in credit {
        elements.push(CreditElement::Artist(ac));
        if let Some(phrase) = ac.joinphrase.as_deref().filter(|p| !p.is_empty()) {
            elements.push(CreditElement::JoinPhrase(phrase));
        }
    }
    elements
}

/// Picks the first primary alias in the most preferred locale that has one,
/// skipping aliases of ignored types.
pub fn preferred_alias<'a>(aliases: &'a [Alias], import: &Import) -> Option<&'a Alias> {
    if aliases.is_empty() {
        return None;
    }
    let ignored = import
        .ignored_alias_types
        .iter()
        .map(|t| t.to_lowercase())
        .collect::<Vec<_>>();
    import.languages.iter().find_map(|locale| {
        aliases
            .iter()
            .filter(|a| a.locale.as_deref() == Some(locale.as_str()))
            .filter(|a| a.primary == Some(true))
            .find(|a| {
                let kind = a.type_field.as_deref().unwrap_or_default().to_lowercase();
                !ignored.contains(&kind)
            })
    })
}

#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct FlatCredit {
    pub name: String,
    pub sort_name: String,
    pub credit: String,
}

pub fn flatten_artist_credit(credit: &[ArtistCredit], import: &Import) -> FlatCredit {
    let mut flat = FlatCredit::default();
    for element in credit_elements(credit) {
        match element {
            CreditElement::JoinPhrase(phrase) => {
                flat.name.push_str(phrase);
                flat.sort_name.push_str(phrase);
                flat.credit.push_str(phrase);
            }
            CreditElement::Artist(ac) => {
                let alias = preferred_alias(&ac.artist.aliases, import);
                let name = alias.map_or(ac.artist.name.as_str(), |a| a.name.as_str());
                let sort_name = alias
                    .and_then(|a| a.sort_name.as_deref())
                    .or(ac.artist.sort_name.as_deref())
                    .unwrap_or(name);
                let credited = ac.name.as_deref().filter(|n| !n.is_empty()).unwrap_or(name);
                flat.name.push_str(name);
                flat.sort_name.push_str(sort_name);
                flat.credit.push_str(credited);
            }
        }
    }
    flat
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::musicbrainz::Artist;

    fn alias(name: &str, locale: &str, primary: bool) -> Alias {
        Alias {
            name: name.to_string(),
            sort_name: Some(format!("{name}, sort")),
            locale: Some(locale.to_string()),
            primary: primary.then_some(true),
            type_field: Some("Artist name".to_string()),
        }
    }

    fn credit(name: &str, sort_name: &str, join: &str) -> ArtistCredit {
        ArtistCredit {
            name: Some(name.to_string()),
            joinphrase: Some(join.to_string()),
            artist: Artist {
                id: format!("{name}-id"),
                name: name.to_string(),
                sort_name: Some(sort_name.to_string()),
                ..Default::default()
            },
        }
    }

    fn import(languages: &[&str], ignored: &[&str]) -> Import {
        Import {
            languages: languages.iter().map(|s| s.to_string()).collect(),
            ignored_alias_types: ignored.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn locale_order_beats_list_order() {
        let aliases = vec![alias("Le Nom", "fr", true), alias("The Name", "en", true)];
        let found = preferred_alias(&aliases, &import(&["en", "fr"], &[]));
        assert_eq!(found.map(|a| a.name.as_str()), Some("The Name"));
    }

    #[test]
    fn only_primary_aliases_count() {
        let aliases = vec![alias("Secondary", "en", false), alias("Le Nom", "fr", true)];
        let found = preferred_alias(&aliases, &import(&["en", "fr"], &[]));
        assert_eq!(found.map(|a| a.name.as_str()), Some("Le Nom"));
    }

    #[test]
    fn ignored_types_are_case_insensitive() {
        let aliases = vec![alias("The Name", "en", true)];
        assert!(preferred_alias(&aliases, &import(&["en"], &["ARTIST NAME"])).is_none());
    }

    #[test]
    fn aliases_without_locale_never_match() {
        let mut a = alias("The Name", "en", true);
        a.locale = None;
        assert!(preferred_alias(&[a], &import(&["en"], &[])).is_none());
    }

    #[test]
    fn flattens_with_join_phrases() {
        let credits = vec![credit("A", "A sort", " & "), credit("B", "B sort", "")];
        let flat = flatten_artist_credit(&credits, &Import::default());
        assert_eq!(flat.name, "A & B");
        assert_eq!(flat.sort_name, "A sort & B sort");
        assert_eq!(flat.credit, "A & B");
    }

    #[test]
    fn alias_and_credited_name_are_used() {
        let mut a = credit("Артист", "Артист", "");
        a.name = Some("Credited".to_string());
        a.artist.aliases = vec![alias("Artist", "en", true)];
        let flat = flatten_artist_credit(&[a], &import(&["en"], &[]));
        assert_eq!(flat.name, "Artist");
        assert_eq!(flat.sort_name, "Artist, sort");
        assert_eq!(flat.credit, "Credited");
    }

    #[test]
    fn sort_name_falls_back_to_name() {
        let mut a = credit("Solo", "", "");
        a.artist.sort_name = None;
        let flat = flatten_artist_credit(&[a], &Import::default());
        assert_eq!(flat.sort_name, "Solo");
    }

    #[test]
    fn elements_follow_credit_order() {
        let credits = vec![credit("A", "A", " feat. "), credit("B", "B", "")];
        let elements = credit_elements(&credits);
        assert_eq!(elements.len(), 3);
        assert_eq!(elements[1], CreditElement::JoinPhrase(" feat. "));
    }
}
