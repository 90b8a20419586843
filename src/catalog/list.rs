//! Search and ordering for the catalog list.

use std::cmp::Ordering;

use super::dog::Dog;
use super::geo::{Coord, distance};

/// Dogs whose name contains `query`, ignoring case. An empty query keeps all.
pub fn search<'a>(dogs: &'a [Dog], query: &str) -> Vec<&'a Dog> {
    let needle = query.trim().to_lowercase();
    dogs.iter()
        .filter(|dog| dog.name.to_lowercase().contains(&needle))
        .collect()
}

/// Fills `distance_km` from `origin` for every dog that has a location.
pub fn annotate_distances(dogs: &mut [Dog], origin: Coord) {
    for dog in dogs.iter_mut() {
        dog.distance_km = dog.location.map(|loc| distance(origin, loc));
    }
}

/// Nearest first. Dogs with no known distance keep their order at the end.
pub fn sort_by_distance(dogs: &mut [Dog]) {
    dogs.sort_by(|a, b| match (a.distance_km, b.distance_km) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dogs() -> Vec<Dog> {
        vec![
            Dog::new("Max", "Beagle", "a").with_location(Coord::new(0.0, 2.0)),
            Dog::new("Maximus", "Mastiff", "b"),
            Dog::new("Luna", "Husky", "c").with_location(Coord::new(0.0, 1.0)),
            Dog::new("Toby", "Pug", "d"),
        ]
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let all = dogs();
        let names: Vec<_> = search(&all, "MAX").iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["Max", "Maximus"]);
    }

    #[test]
    fn test_empty_query_keeps_everything() {
        let all = dogs();
        assert_eq!(search(&all, "").len(), all.len());
        assert_eq!(search(&all, "   ").len(), all.len());
    }

    #[test]
    fn test_no_match() {
        assert!(search(&dogs(), "rex").is_empty());
    }

    #[test]
    fn test_sort_nearest_first_unknown_last() {
        let mut all = dogs();
        annotate_distances(&mut all, Coord::new(0.0, 0.0));
        sort_by_distance(&mut all);
        let names: Vec<_> = all.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["Luna", "Max", "Maximus", "Toby"]);
        assert_eq!(all[0].distance_km, Some(111.19));
        assert_eq!(all[3].distance_km, None);
    }
}
