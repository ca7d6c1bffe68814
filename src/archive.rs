use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

use crate::content::post::Post;

/// The derived year/month archive index. Never persisted; rebuilt from the
/// post list on every use.
///
/// Ordering contract: year and month groups run most-recent-first, while
/// the posts inside a group run oldest-first. Group members reference the
/// post slice the index was built from.
pub struct Archive {
    pub years: Vec<YearGroup>,
}

pub struct YearGroup {
    /// Start-of-year marker.
    pub date: NaiveDate,
    /// Indices into the source post slice, ascending by creation.
    pub posts: Vec<usize>,
    pub months: Vec<MonthGroup>,
}

pub struct MonthGroup {
    /// Start-of-month marker.
    pub date: NaiveDate,
    pub archive_url: String,
    /// Indices into the source post slice, ascending by creation.
    pub posts: Vec<usize>,
}

/// Substitutes `:year` and `:month` into the archive URL format string.
/// Plain token replacement; anything else in the template stays untouched.
pub fn archive_url_for_date(format: &str, date: NaiveDate) -> String {
    format
        .replace(":year", &format!("{:04}", date.year()))
        .replace(":month", &format!("{:02}", date.month()))
}

/// Builds the archive index over `posts`. The slice order does not matter;
/// groups sort themselves.
pub fn build(posts: &[Post], url_format: &str) -> Archive {
    let mut by_year: BTreeMap<i32, Vec<usize>> = BTreeMap::new();
    for (idx, post) in posts.iter().enumerate() {
        by_year.entry(post.created.year()).or_default().push(idx);
    }

    let mut years = vec![];
    for (year, mut year_posts) in by_year.into_iter().rev() {
        sort_ascending(posts, &mut year_posts);

        let mut by_month: BTreeMap<u32, Vec<usize>> = BTreeMap::new();
        for &idx in year_posts.iter() {
            by_month
                .entry(posts[idx].created.month())
                .or_default()
                .push(idx);
        }

        let mut months = vec![];
        for (month, mut month_posts) in by_month.into_iter().rev() {
            sort_ascending(posts, &mut month_posts);
            let date = NaiveDate::from_ymd_opt(year, month, 1).unwrap();
            months.push(MonthGroup {
                date,
                archive_url: archive_url_for_date(url_format, date),
                posts: month_posts,
            });
        }

        years.push(YearGroup {
            date: NaiveDate::from_ymd_opt(year, 1, 1).unwrap(),
            posts: year_posts,
            months,
        });
    }

    Archive { years }
}

// Ascending by creation date, slug as the deterministic tie-break.
fn sort_ascending(posts: &[Post], indices: &mut [usize]) {
    indices.sort_by(|&a, &b| {
        posts[a]
            .created
            .cmp(&posts[b].created)
            .then_with(|| posts[a].slug().cmp(posts[b].slug()))
    });
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use chrono::Utc;

    use crate::content::content_file::ContentFile;

    use super::*;

    const URL_FORMAT: &str = "/archive/:year/:month";

    fn make_post(year: i32, month: u32, day: u32, slug: &str) -> Post {
        Post {
            file: ContentFile::new(slug.to_string(), PathBuf::from(slug)),
            created: NaiveDate::from_ymd_opt(year, month, day).unwrap(),
            updated: Utc::now(),
        }
    }

    #[test]
    fn test_archive_url_for_date() {
        let date = NaiveDate::from_ymd_opt(2012, 3, 1).unwrap();
        assert_eq!(archive_url_for_date("/archive/:year/:month", date), "/archive/2012/03");
        assert_eq!(archive_url_for_date("/:month-:year.html", date), "/03-2012.html");
        // Tokens absent from the template are simply never substituted
        assert_eq!(archive_url_for_date("/posts", date), "/posts");
    }

    #[test]
    fn test_single_year_two_months() {
        let posts = vec![
            make_post(2012, 3, 1, "march-post"),
            make_post(2012, 11, 15, "november-post"),
        ];
        let archive = build(&posts, URL_FORMAT);

        assert_eq!(archive.years.len(), 1);
        let year = &archive.years[0];
        assert_eq!(year.date, NaiveDate::from_ymd_opt(2012, 1, 1).unwrap());
        assert_eq!(year.posts, vec![0, 1]);

        let months: Vec<u32> = year.months.iter().map(|m| m.date.month()).collect();
        assert_eq!(months, vec![11, 3]);
        assert_eq!(year.months[0].archive_url, "/archive/2012/11");
        assert_eq!(year.months[1].archive_url, "/archive/2012/03");
        assert_eq!(year.months[0].posts, vec![1]);
        assert_eq!(year.months[1].posts, vec![0]);
    }

    #[test]
    fn test_years_descend_posts_ascend() {
        let posts = vec![
            make_post(2013, 6, 2, "newest"),
            make_post(2011, 1, 5, "oldest"),
            make_post(2013, 6, 1, "newer"),
        ];
        let archive = build(&posts, URL_FORMAT);

        let years: Vec<i32> = archive.years.iter().map(|y| y.date.year()).collect();
        assert_eq!(years, vec![2013, 2011]);

        // Members inside a group go oldest-first
        assert_eq!(archive.years[0].posts, vec![2, 0]);
        assert_eq!(archive.years[0].months[0].posts, vec![2, 0]);
    }

    #[test]
    fn test_equal_dates_tie_break_on_slug() {
        let posts = vec![
            make_post(2012, 5, 1, "zulu"),
            make_post(2012, 5, 1, "alpha"),
        ];
        let archive = build(&posts, URL_FORMAT);
        assert_eq!(archive.years[0].months[0].posts, vec![1, 0]);
    }

    #[test]
    fn test_empty_post_list() {
        let archive = build(&[], URL_FORMAT);
        assert!(archive.years.is_empty());
    }
}
