pub mod article;
pub mod blog_grid;
pub mod navigation;
pub mod portfolio;
pub mod templates;

pub use article::ArticleComponent;
pub use blog_grid::BlogGridComponent;
pub use navigation::NavigationComponent;
pub use portfolio::PortfolioComponent;
pub use templates::TemplateComponent;
