use std::cmp::Ordering;
use std::collections::HashMap;

use crate::model::ApplicationEntity;
use crate::recency::RecencyList;

/// Default list order: recent activations first, then running apps, then by name.
pub fn default_order(entities: &mut [ApplicationEntity], recency: &RecencyList) {
    let positions: HashMap<&str, usize> = recency
        .names()
        .iter()
        .enumerate()
        .map(|(index, name)| (name.as_str(), index))
        .collect();

    entities.sort_by(|a, b| {
        let a_recent = positions.get(a.name.as_str());
        let b_recent = positions.get(b.name.as_str());
        match (a_recent, b_recent) {
            (Some(a_index), Some(b_index)) => a_index.cmp(b_index),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => b
                .is_running
                .cmp(&a.is_running)
                .then_with(|| compare_names(&a.name, &b.name)),
        }
    });
}

fn compare_names(a: &str, b: &str) -> Ordering {
    let folded = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));
    folded.then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::default_order;
    use crate::model::{ApplicationEntity, InstalledApp};
    use crate::recency::RecencyList;

    fn names(entities: &[ApplicationEntity]) -> Vec<&str> {
        entities.iter().map(|entity| entity.name.as_str()).collect()
    }

    #[test]
    fn recent_first_then_alphabetical() {
        let mut recency = RecencyList::default();
        recency.touch("Safari");
        let mut entities: Vec<ApplicationEntity> = ["Safari", "Notes", "Mail"]
            .iter()
            .map(|name| {
                ApplicationEntity::installed(
                    &InstalledApp::new(name, format!("/Applications/{name}.app")),
                    false,
                )
            })
            .collect();

        default_order(&mut entities, &recency);

        assert_eq!(names(&entities), vec!["Safari", "Mail", "Notes"]);
    }

    #[test]
    fn recency_index_then_running_then_case_insensitive_name() {
        let mut recency = RecencyList::default();
        recency.touch("Zed");
        recency.touch("Xcode");
        let mut entities = vec![
            ApplicationEntity::named("beta"),
            ApplicationEntity::named("Alpha"),
            ApplicationEntity::running("Terminal"),
            ApplicationEntity::named("Zed"),
            ApplicationEntity::named("Xcode"),
        ];

        default_order(&mut entities, &recency);

        assert_eq!(
            names(&entities),
            vec!["Xcode", "Zed", "Terminal", "Alpha", "beta"]
        );
    }
}
