//! Menu state: which page of the dashboard is selected.

use crate::insights::Dimension;
use std::fmt;

/// Pages under the Home menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeView {
    RetailData,
    Numerical,
    Categorical,
    Insights(Dimension),
    Conclusion,
}

/// Top-level menu entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nav {
    Home(HomeView),
    Dataset,
    Technologies,
}

impl Default for Nav {
    fn default() -> Self {
        Nav::Home(HomeView::RetailData)
    }
}

impl HomeView {
    /// Every Home page in menu order.
    pub fn all() -> Vec<HomeView> {
        let mut views = vec![
            HomeView::RetailData,
            HomeView::Numerical,
            HomeView::Categorical,
        ];
        views.extend(Dimension::ALL.iter().map(|&d| HomeView::Insights(d)));
        views.push(HomeView::Conclusion);
        views
    }
}

impl fmt::Display for HomeView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HomeView::RetailData => f.write_str("Retail Data"),
            HomeView::Numerical => f.write_str("Numerical Variables"),
            HomeView::Categorical => f.write_str("Categorical Variables"),
            HomeView::Insights(d) => write!(f, "{} Insights", d),
            HomeView::Conclusion => f.write_str("Conclusion"),
        }
    }
}

impl fmt::Display for Nav {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Nav::Home(view) => write!(f, "Home / {}", view),
            Nav::Dataset => f.write_str("Dataset"),
            Nav::Technologies => f.write_str("Technologies"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_retail_data() {
        assert_eq!(Nav::default(), Nav::Home(HomeView::RetailData));
    }

    #[test]
    fn test_home_views_cover_every_dimension() {
        let views = HomeView::all();
        assert_eq!(views.len(), 3 + Dimension::ALL.len() + 1);
        assert_eq!(views.first(), Some(&HomeView::RetailData));
        assert_eq!(views.last(), Some(&HomeView::Conclusion));
        assert!(views.contains(&HomeView::Insights(Dimension::SubCategory)));
    }

    #[test]
    fn test_labels() {
        assert_eq!(
            HomeView::Insights(Dimension::ShipMode).to_string(),
            "Ship Mode Insights"
        );
        assert_eq!(Nav::Home(HomeView::Conclusion).to_string(), "Home / Conclusion");
    }
}
