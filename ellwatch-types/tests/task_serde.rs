use ellwatch_types::{EllError, TaskType};

#[test]
fn task_type_uses_wire_names() {
    let json = serde_json::to_string(&TaskType::ALL).expect("serialize task types");
    assert_eq!(
        json,
        r#"["DISTINCT_ACCOUNT_ID_COUNT","DISTINCT_IP_ADDRESS_COUNT","DISTINCT_ACCOUNT_EMAIL_DOMAIN_COUNT"]"#
    );

    let de: TaskType =
        serde_json::from_str(r#""DISTINCT_IP_ADDRESS_COUNT""#).expect("deserialize task type");
    assert_eq!(de, TaskType::Ip);
}

#[test]
fn task_type_display_matches_wire_name() {
    for t in TaskType::ALL {
        assert_eq!(t.to_string(), t.as_str());
        assert_eq!(TaskType::ALL[t.index()], t);
    }
}

#[test]
fn task_type_parses_wire_and_short_keys() {
    assert_eq!("domain".parse::<TaskType>().unwrap(), TaskType::EmailDomain);
    assert_eq!(
        "distinct_account_id_count".parse::<TaskType>().unwrap(),
        TaskType::Account
    );
    assert!(matches!(
        "DISTINCT_USER_AGENT_COUNT".parse::<TaskType>(),
        Err(EllError::InvalidArg(_))
    ));
}

#[test]
fn fetch_failure_classification() {
    assert!(EllError::status("http", 503).is_fetch_failure());
    assert!(EllError::fetch_timeout("http", TaskType::Ip).is_fetch_failure());
    assert!(!EllError::Config("bad".into()).is_fetch_failure());

    let e = EllError::fetch_timeout("http", TaskType::Ip);
    assert_eq!(e.to_string(), "fetch timed out: DISTINCT_IP_ADDRESS_COUNT via http");
}
