mod dashboard;
pub mod login;
mod logs;
pub mod onboard;
mod settings;

pub use dashboard::DashboardPage;
pub use login::LoginPage;
pub use logs::LogsPage;
pub use onboard::OnboardPage;
pub use settings::SettingsPage;
