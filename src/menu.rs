use fuzzy_matcher::{skim::SkimMatcherV2, FuzzyMatcher};

use crate::data::Dish;

/// Keep the dishes whose name fuzzy-matches `pattern`, in menu order.
pub fn filter_dishes(dishes: Vec<Dish>, pattern: &str) -> Vec<Dish> {
    let pattern = pattern.trim();
    if pattern.is_empty() {
        return dishes;
    }

    let matcher = SkimMatcherV2::default();
    dishes
        .into_iter()
        .filter(|dish| matcher.fuzzy_match(&dish.name, pattern).is_some())
        .collect()
}

pub fn featured(dishes: &[Dish]) -> Option<&Dish> {
    dishes.iter().find(|dish| dish.featured)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::DishBuilder;

    fn menu() -> Vec<Dish> {
        [("0", "Uthappizza", false), ("1", "Zucchipakoda", true), ("2", "Vadonut", true)]
            .into_iter()
            .map(|(id, name, featured)| {
                DishBuilder::default()
                    .id(id)
                    .name(name)
                    .featured(featured)
                    .build()
                    .unwrap()
            })
            .collect()
    }

    #[test]
    fn test_filter_keeps_order() {
        let names: Vec<_> = filter_dishes(menu(), "pizza")
            .into_iter()
            .map(|dish| dish.name)
            .collect();
        assert_eq!(names, ["Uthappizza"]);

        let names: Vec<_> = filter_dishes(menu(), "d")
            .into_iter()
            .map(|dish| dish.name)
            .collect();
        assert_eq!(names, ["Zucchipakoda", "Vadonut"]);
    }

    #[test]
    fn test_blank_pattern_keeps_everything() {
        assert_eq!(filter_dishes(menu(), "  ").len(), 3);
        assert!(filter_dishes(menu(), "qqq").is_empty());
    }

    #[test]
    fn test_featured_is_first_flagged() {
        let dishes = menu();
        assert_eq!(featured(&dishes).map(|dish| dish.id.as_str()), Some("1"));
        assert!(featured(&dishes[..1]).is_none());
    }
}
