use qerota::rota::{RotaSheet, WidgetParameter};
use qerota::widget::WidgetView;

const EXPORT: &str = "Date,Consultant,Day SpR,Night SpR\r\n\
,,,\r\n\
Thu 17 Oct,Jane Doe,\"Smith, John\",Jon Snow\r\n\
Fri 18 Oct,Anne Lee,Kate Bush,Bill Jones\r\n";

#[test]
fn test_tomorrow_card() {
    let sheet = RotaSheet::parse(EXPORT).unwrap();
    let parameter = WidgetParameter::parse(Some("1"));
    let day = sheet.day(parameter.offset).unwrap();

    let mut view = WidgetView::new(day);
    view.invalid_parameter = parameter.invalid;
    let card = view.render(24);

    assert!(card.starts_with("       Fri 18 Oct\n"));
    assert!(card.contains("Night SpR\n"));
    assert!(card.contains("Bill Jones\n"));
    assert!(!card.contains("⚠️"));
}

#[test]
fn test_invalid_parameter_falls_back_to_today_with_warning() {
    let sheet = RotaSheet::parse(EXPORT).unwrap();
    let parameter = WidgetParameter::parse(Some("7"));
    let day = sheet.day(parameter.offset).unwrap();
    assert_eq!(day.date, "Thu 17 Oct");
    // Quoted cells keep their embedded comma.
    assert_eq!(day.entries[1].name, "Smith, John");

    let mut view = WidgetView::new(day);
    view.invalid_parameter = parameter.invalid;
    view.update_available = true;
    let card = view.render(24);
    assert!(card.contains("⚠️"));
    assert!(card.contains("⬇️"));
}
