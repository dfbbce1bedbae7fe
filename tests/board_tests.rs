use std::cell::RefCell;
use std::rc::Rc;

use report_chart::api::{
    ChartBoard, ChartView, ChartViewConfig, HeadlessSurfaceProvider, ThemeObserver,
};
use report_chart::core::{ChartSpec, ChartType, ThemeContext, ThemeMode};

type Log = Rc<RefCell<Vec<String>>>;

struct Recorder {
    id: String,
    log: Log,
}

impl Recorder {
    fn boxed(id: &str, log: &Log) -> Box<dyn ThemeObserver> {
        Box::new(Self {
            id: id.to_owned(),
            log: Rc::clone(log),
        })
    }
}

impl ThemeObserver for Recorder {
    fn id(&self) -> &str {
        &self.id
    }

    fn theme_changed(&mut self, theme: &ThemeContext) {
        self.log
            .borrow_mut()
            .push(format!("{}:{:?}", self.id, theme.mode()));
    }
}

fn view(theme: ThemeContext) -> ChartView<HeadlessSurfaceProvider> {
    let mut view = ChartView::new(ChartViewConfig::default(), HeadlessSurfaceProvider::new(), theme)
        .expect("view");
    view.set_spec(ChartSpec::categories(ChartType::Donut, &["A", "B"], &[1.0, 2.0]))
        .expect("spec");
    view
}

#[test]
fn observers_are_notified_in_registration_order() {
    let log = Log::default();
    let mut board: ChartBoard<HeadlessSurfaceProvider> = ChartBoard::new(ThemeContext::light());
    board.register_observer(Recorder::boxed("sidebar", &log)).expect("sidebar");
    board.register_observer(Recorder::boxed("toolbar", &log)).expect("toolbar");

    board.set_theme(ThemeContext::dark()).expect("switch");
    assert_eq!(*log.borrow(), ["sidebar:Dark", "toolbar:Dark"]);

    assert!(board.unregister_observer("sidebar"));
    assert!(!board.unregister_observer("sidebar"));
    board.set_theme(ThemeContext::light()).expect("switch back");
    assert_eq!(log.borrow().last().map(String::as_str), Some("toolbar:Light"));
    assert_eq!(board.observer_count(), 1);
}

#[test]
fn duplicate_or_empty_observer_ids_are_rejected() {
    let log = Log::default();
    let mut board: ChartBoard<HeadlessSurfaceProvider> = ChartBoard::new(ThemeContext::light());
    board.register_observer(Recorder::boxed("legend", &log)).expect("first");
    assert!(board.register_observer(Recorder::boxed("legend", &log)).is_err());
    assert!(board.register_observer(Recorder::boxed("", &log)).is_err());
    assert_eq!(board.observer_count(), 1);
}

#[test]
fn theme_switch_reaches_every_chart() {
    let mut board = ChartBoard::new(ThemeContext::light());
    board.insert("sales", view(ThemeContext::light())).expect("sales");
    board.insert("costs", view(ThemeContext::dark())).expect("costs");
    assert_eq!(
        board.get("costs").expect("costs").theme().mode(),
        ThemeMode::Light,
        "inserted views adopt the board theme"
    );

    let before: Vec<u64> = board
        .names()
        .map(|name| board.get(name).expect("view").redraw_count())
        .collect();
    board.set_theme(ThemeContext::dark()).expect("switch");

    for (name, previous) in board.names().zip(before) {
        let view = board.get(name).expect("view");
        assert_eq!(view.theme().mode(), ThemeMode::Dark);
        assert_eq!(view.spec().theme_mode, ThemeMode::Dark);
        assert_eq!(view.redraw_count(), previous + 1);
    }
    assert_eq!(board.names().collect::<Vec<_>>(), ["sales", "costs"]);
}

#[test]
fn charts_can_be_replaced_and_removed() {
    let mut board = ChartBoard::new(ThemeContext::light());
    assert!(board.insert("", view(ThemeContext::light())).is_err());
    assert!(board.insert("a", view(ThemeContext::light())).expect("a").is_none());
    assert!(board.insert("a", view(ThemeContext::light())).expect("replace").is_some());
    assert_eq!(board.len(), 1);
    assert!(board.remove("a").is_some());
    assert!(board.is_empty());
}
