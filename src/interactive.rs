//! 対話式の画面操作
//!
//! - 履歴: フィルタチップを選ぶと取得済みデータ上で絞り込む（再取得しない）
//! - 天気: 前日/翌日に移動するたびに再取得する

use crate::api::HistorySource;
use crate::error::{Result, TeaDoctorError};
use crate::history::{render_screen, HistoryController};
use crate::progress;
use crate::weather::{render_weather, WeatherScreen, WeatherSource};
use dialoguer::Select;
use tea_doctor_common::{format_date, Session};

/// 対話アクション
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChipAction {
    /// フィルタ解除
    ShowAll,
    /// ラベルで絞り込み
    Select(&'static str),
    /// サーバーから再取得
    Refresh,
    Quit,
}

/// メニュー項目（All, 各ラベル, Refresh, Quit の順）
pub fn menu_items(features: &[&str]) -> Vec<String> {
    let mut items = Vec::with_capacity(features.len() + 3);
    items.push("All".to_string());
    items.extend(features.iter().map(|f| f.to_string()));
    items.push("Refresh".to_string());
    items.push("Quit".to_string());
    items
}

/// 選択インデックスをアクションに変換
pub fn action_for(index: usize, features: &'static [&'static str]) -> ChipAction {
    match index {
        0 => ChipAction::ShowAll,
        i if i <= features.len() => ChipAction::Select(features[i - 1]),
        i if i == features.len() + 1 => ChipAction::Refresh,
        _ => ChipAction::Quit,
    }
}

pub async fn run_interactive_history<S: HistorySource>(
    controller: &mut HistoryController,
    source: &S,
    session: Option<&Session>,
) -> Result<()> {
    let features = controller.features();
    let items = menu_items(features);

    loop {
        println!("{}\n", render_screen(&controller.view(), session));

        let current = match controller.active_filter().label() {
            Some(label) => features.iter().position(|f| *f == label).map_or(0, |i| i + 1),
            None => 0,
        };
        let index = Select::new()
            .with_prompt("Filter by feature")
            .items(&items)
            .default(current)
            .interact()
            .map_err(|e| TeaDoctorError::Prompt(e.to_string()))?;

        match action_for(index, features) {
            ChipAction::ShowAll => controller.set_filter(None),
            ChipAction::Select(label) => controller.set_filter(Some(label)),
            ChipAction::Refresh => {
                let spinner = progress::spinner("Refreshing detection history...");
                controller.fetch(source).await;
                spinner.finish_and_clear();
            }
            ChipAction::Quit => return Ok(()),
        }
    }
}

/// 天気画面のアクション
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayAction {
    PreviousDay,
    NextDay,
    Refresh,
    Quit,
}

pub const DAY_MENU: &[&str] = &["Previous day", "Next day", "Refresh", "Quit"];

pub fn day_action_for(index: usize) -> DayAction {
    match index {
        0 => DayAction::PreviousDay,
        1 => DayAction::NextDay,
        2 => DayAction::Refresh,
        _ => DayAction::Quit,
    }
}

/// アクションを画面に適用。`Quit` なら `false`
pub async fn apply_day_action<S: WeatherSource>(
    screen: &mut WeatherScreen,
    source: &S,
    action: DayAction,
) -> Result<bool> {
    match action {
        DayAction::PreviousDay => {
            screen.previous_day();
        }
        DayAction::NextDay => {
            screen.next_day();
        }
        DayAction::Refresh => {}
        DayAction::Quit => return Ok(false),
    }

    let message = format!("Loading weather for {}...", format_date(&screen.day()));
    let spinner = progress::spinner(&message);
    let loaded = screen.load(source).await;
    spinner.finish_and_clear();
    loaded?;
    Ok(true)
}

pub async fn run_interactive_weather<S: WeatherSource>(
    screen: &mut WeatherScreen,
    source: &S,
    place: &str,
) -> Result<()> {
    let mut last = DayAction::Refresh;
    loop {
        println!("{}\n", render_weather(screen, place));

        let index = Select::new()
            .with_prompt(format!("Weather on {}", format_date(&screen.day())))
            .items(DAY_MENU)
            .default(last as usize)
            .interact()
            .map_err(|e| TeaDoctorError::Prompt(e.to_string()))?;

        last = day_action_for(index);
        if !apply_day_action(screen, source, last).await? {
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::LoadState;
    use chrono::NaiveDate;
    use std::future::Future;
    use tea_doctor_common::{GeoLocation, WeatherClassification};

    const FEATURES: &[&str] = &["healthy", "bark_cancer", "leaf_cancer"];

    #[test]
    fn test_menu_items_order() {
        assert_eq!(
            menu_items(FEATURES),
            vec!["All", "healthy", "bark_cancer", "leaf_cancer", "Refresh", "Quit"]
        );
    }

    #[test]
    fn test_action_for_each_index() {
        assert_eq!(action_for(0, FEATURES), ChipAction::ShowAll);
        assert_eq!(action_for(1, FEATURES), ChipAction::Select("healthy"));
        assert_eq!(action_for(3, FEATURES), ChipAction::Select("leaf_cancer"));
        assert_eq!(action_for(4, FEATURES), ChipAction::Refresh);
        assert_eq!(action_for(5, FEATURES), ChipAction::Quit);
        assert_eq!(action_for(99, FEATURES), ChipAction::Quit);
    }

    #[test]
    fn test_day_action_for_each_index() {
        assert_eq!(DAY_MENU.len(), 4);
        assert_eq!(day_action_for(0), DayAction::PreviousDay);
        assert_eq!(day_action_for(1), DayAction::NextDay);
        assert_eq!(day_action_for(2), DayAction::Refresh);
        assert_eq!(day_action_for(3), DayAction::Quit);
        assert_eq!(day_action_for(7), DayAction::Quit);
    }

    struct DayEcho;

    impl WeatherSource for DayEcho {
        fn classify(
            &self,
            _location: &GeoLocation,
            _session: &Session,
            day: NaiveDate,
        ) -> impl Future<Output = Result<WeatherClassification>> + Send {
            std::future::ready(Ok(WeatherClassification {
                today_weather_class: "Cloudy".into(),
                temps: vec![],
                humidities: vec![],
                rainfalls: vec![],
                wind: None,
                detection_date: Some(day.format("%Y-%m-%d").to_string()),
            }))
        }
    }

    fn weather_screen() -> WeatherScreen {
        WeatherScreen::new(
            Some(GeoLocation::new(6.7, 80.4).unwrap()),
            Some(Session::new("u1", None)),
            NaiveDate::from_ymd_opt(2023, 9, 1).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_day_actions_move_and_reload() {
        let mut screen = weather_screen();

        assert!(apply_day_action(&mut screen, &DayEcho, DayAction::PreviousDay).await.unwrap());
        assert_eq!(screen.day(), NaiveDate::from_ymd_opt(2023, 8, 31).unwrap());
        assert_eq!(screen.state(), &LoadState::Ready);
        assert!(render_weather(&screen, "Rathganga").contains("Date: 8/31/2023"));

        assert!(apply_day_action(&mut screen, &DayEcho, DayAction::NextDay).await.unwrap());
        assert!(apply_day_action(&mut screen, &DayEcho, DayAction::NextDay).await.unwrap());
        assert!(render_weather(&screen, "Rathganga").contains("Date: 9/2/2023"));

        assert!(apply_day_action(&mut screen, &DayEcho, DayAction::Refresh).await.unwrap());
        assert_eq!(screen.day(), NaiveDate::from_ymd_opt(2023, 9, 2).unwrap());
    }

    #[tokio::test]
    async fn test_quit_leaves_screen_untouched() {
        let mut screen = weather_screen();
        assert!(!apply_day_action(&mut screen, &DayEcho, DayAction::Quit).await.unwrap());
        assert_eq!(screen.state(), &LoadState::Idle);
        assert_eq!(screen.day(), NaiveDate::from_ymd_opt(2023, 9, 1).unwrap());
    }
}
