//! Free-text tag overlap between the giver's answers and a product.

/// Counts (user tag, product tag) pairs where either lowercased string
/// contains the other. Empty tags never match.
pub fn count_tag_matches<U, P>(user_tags: &[U], product_tags: &[P]) -> usize
where
    U: AsRef<str>,
    P: AsRef<str>,
{
    let user: Vec<String> = normalized(user_tags);
    let product: Vec<String> = normalized(product_tags);

    user.iter()
        .map(|user_tag| {
            product
                .iter()
                .filter(|product_tag| {
                    product_tag.contains(user_tag.as_str()) || user_tag.contains(product_tag.as_str())
                })
                .count()
        })
        .sum()
}

fn normalized<T: AsRef<str>>(tags: &[T]) -> Vec<String> {
    tags.iter()
        .map(|tag| tag.as_ref().trim().to_lowercase())
        .filter(|tag| !tag.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::count_tag_matches;

    #[test]
    fn containment_is_bidirectional_and_case_insensitive() {
        let user = ["Tecnologia e gadgets", "AMOR"];
        let product = ["tecnologia", "amor e carinho", "viagem"];

        assert_eq!(count_tag_matches(&user, &product), 2);
    }

    #[test]
    fn one_user_tag_can_match_several_product_tags() {
        let user = ["Amor e carinho"];
        let product = ["amor", "carinho", "amor e carinho"];

        assert_eq!(count_tag_matches(&user, &product), 3);
    }

    #[test]
    fn empty_tags_are_ignored() {
        let user = ["", "  ", "Natal"];
        let product = ["", "natal"];

        assert_eq!(count_tag_matches(&user, &product), 1);

        let none: [&str; 0] = [];
        assert_eq!(count_tag_matches(&none, &product), 0);
    }
}
