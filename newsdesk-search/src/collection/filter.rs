//! Category filtering and fixed-size paging of the article feed.

use crate::types::Article;

/// Articles shown per dashboard page.
pub const DEFAULT_PAGE_SIZE: usize = 50;

/// Keep articles whose `category_id` is in `selected`.
///
/// An empty selection means "no filter" and returns everything. Articles
/// without a category never match a non-empty selection.
pub fn filter_by_categories(articles: &[Article], selected: &[u32]) -> Vec<Article> {
    if selected.is_empty() {
        return articles.to_vec();
    }
    articles
        .iter()
        .filter(|article| article.category_id.is_some_and(|id| selected.contains(&id)))
        .cloned()
        .collect()
}

/// Number of pages needed for `total` items. Zero items is zero pages.
pub fn page_count(total: usize, per_page: usize) -> usize {
    if per_page == 0 {
        return 0;
    }
    total.div_ceil(per_page)
}

/// The 1-based `page` of `items`. Page 0, a page past the end, or a zero
/// page size yields an empty slice.
pub fn paginate<T>(items: &[T], page: usize, per_page: usize) -> &[T] {
    if page == 0 || per_page == 0 {
        return &[];
    }
    let start = (page - 1).saturating_mul(per_page);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(per_page).min(items.len());
    &items[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_article(id: &str, category: Option<u32>) -> Article {
        let mut article = Article::new(id, "t", "s");
        article.category_id = category;
        article
    }

    #[test]
    fn empty_selection_is_no_filter() {
        let articles = vec![make_article("a", Some(1)), make_article("b", None)];
        assert_eq!(filter_by_categories(&articles, &[]).len(), 2);
    }

    #[test]
    fn keeps_selected_categories_only() {
        let articles = vec![
            make_article("a", Some(1)),
            make_article("b", Some(2)),
            make_article("c", None),
            make_article("d", Some(3)),
        ];
        let out = filter_by_categories(&articles, &[1, 3]);
        let ids: Vec<&str> = out.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, ["a", "d"]);
    }

    #[test]
    fn pages_are_one_based() {
        let items: Vec<u32> = (0..120).collect();
        assert_eq!(paginate(&items, 1, 50), &items[..50]);
        assert_eq!(paginate(&items, 3, 50), &items[100..]);
        assert!(paginate(&items, 4, 50).is_empty());
        assert!(paginate(&items, 0, 50).is_empty());
    }

    #[test]
    fn page_count_rounds_up() {
        assert_eq!(page_count(0, DEFAULT_PAGE_SIZE), 0);
        assert_eq!(page_count(50, DEFAULT_PAGE_SIZE), 1);
        assert_eq!(page_count(51, DEFAULT_PAGE_SIZE), 2);
        assert_eq!(page_count(10, 0), 0);
    }
}
