use fieldedit_core::db::open_db_in_memory;
use fieldedit_core::{
    field_filter, is_editable, parse_message, BridgeMessage, ContainerTag, EditConfig,
    EditRequest, EditSession, Field, HookReply, RecordId, RecordStore, RenderContext,
    SenderContext, SqliteRecordStore, ViewerSurface,
};

#[derive(Default)]
struct TestViewer {
    current: Option<RecordId>,
    suppressed: usize,
    rerendered: Vec<RecordId>,
}

impl ViewerSurface for TestViewer {
    fn current_record(&self) -> Option<RecordId> {
        self.current
    }

    fn suppress_auto_advance(&mut self) {
        self.suppressed += 1;
    }

    fn request_rerender(&mut self, record_id: RecordId) {
        self.rerendered.push(record_id);
    }
}

const UNHANDLED: HookReply = (false, None);

#[test]
fn reference_classifications() {
    assert!(is_editable(""));
    assert!(is_editable("plain text"));
    assert!(!is_editable("{{c1::answer}}"));
    assert!(!is_editable("[latex]x^2[/latex]"));
    assert!(!is_editable("\\(x+1\\)"));
    assert!(!is_editable("[sound:greeting.mp3]"));
}

#[test]
fn reference_message_parses() {
    assert_eq!(
        parse_message("ankisave#Front#42#hello").unwrap().unwrap(),
        BridgeMessage::Save(EditRequest::new(Some(42), "Front", "hello"))
    );
}

#[test]
fn rendered_field_commits_through_session() {
    let mut conn = open_db_in_memory().unwrap();
    let id = SqliteRecordStore::new(&mut conn)
        .create_record(&[Field::new("Front", "hello")], &[])
        .unwrap();
    let config = EditConfig {
        tag: ContainerTag::Span,
        undo: true,
        debug: true,
    };

    let html = field_filter(
        "hello",
        "Front",
        "edit",
        &RenderContext::for_record(id),
        &config,
    );
    assert!(html.contains(&format!(r#"data-nid="{id}""#)));
    assert!(html.contains("stopPropagation"));

    let viewer = TestViewer {
        current: Some(id),
        ..TestViewer::default()
    };
    let mut session = EditSession::new(SqliteRecordStore::new(&mut conn), viewer);

    let focus = session.on_message(
        UNHANDLED,
        "ankisave!speedfocus#",
        SenderContext::Viewer,
        &config,
    );
    assert_eq!(focus, (true, None));

    let blur = format!("ankisave#Front#{id}#hello%20%23world");
    assert_eq!(
        session.on_message(UNHANDLED, &blur, SenderContext::Viewer, &config),
        (true, None)
    );
    // Second blur with identical content must not re-render.
    assert_eq!(
        session.on_message(UNHANDLED, &blur, SenderContext::Viewer, &config),
        (true, None)
    );

    assert_eq!(session.viewer().suppressed, 1);
    assert_eq!(session.viewer().rerendered, vec![id]);
    let record = session.store().get_record(id).unwrap();
    assert_eq!(record.field("Front"), Some("hello #world"));
    assert_eq!(record.revision, 1);
}

#[test]
fn editor_window_messages_are_left_to_other_consumers() {
    let mut conn = open_db_in_memory().unwrap();
    let id = SqliteRecordStore::new(&mut conn)
        .create_record(&[Field::new("Front", "hello")], &[])
        .unwrap();
    let mut session = EditSession::new(SqliteRecordStore::new(&mut conn), TestViewer::default());

    let message = format!("ankisave#Front#{id}#changed");
    let reply = session.on_message(
        UNHANDLED,
        &message,
        SenderContext::EditorWindow,
        &EditConfig::default(),
    );

    assert_eq!(reply, UNHANDLED);
    let record = session.store().get_record(id).unwrap();
    assert_eq!(record.field("Front"), Some("hello"));
}

#[test]
fn deleted_record_is_dropped_silently() {
    let mut conn = open_db_in_memory().unwrap();
    let id = {
        let mut store = SqliteRecordStore::new(&mut conn);
        let id = store
            .create_record(&[Field::new("Front", "hello")], &[])
            .unwrap();
        store.delete_record(id).unwrap();
        id
    };
    let mut session = EditSession::new(
        SqliteRecordStore::new(&mut conn),
        TestViewer {
            current: Some(id),
            ..TestViewer::default()
        },
    );

    let reply = session.on_message(
        UNHANDLED,
        &format!("ankisave#Front#{id}#x"),
        SenderContext::Viewer,
        &EditConfig::default(),
    );
    assert_eq!(reply, (true, None));
    assert!(session.viewer().rerendered.is_empty());
}

#[test]
fn literal_percent_sequences_survive_the_edit_round_trip() {
    let mut conn = open_db_in_memory().unwrap();
    let id = SqliteRecordStore::new(&mut conn)
        .create_record(&[Field::new("Front", "price")], &[])
        .unwrap();
    let config = EditConfig::default();

    let html = field_filter(
        "price",
        "Front",
        "edit",
        &RenderContext::for_record(id),
        &config,
    );
    assert!(html.contains("encodeURIComponent($(this).html())"));

    // What the focus-loss trigger posts after the user types the new text.
    let typed = "50%41 off &amp; 100%";
    let blur = format!("ankisave#Front#{id}#{}", urlencoding::encode(typed));
    let mut session = EditSession::new(
        SqliteRecordStore::new(&mut conn),
        TestViewer {
            current: Some(id),
            ..TestViewer::default()
        },
    );
    assert_eq!(
        session.on_message(UNHANDLED, &blur, SenderContext::Viewer, &config),
        (true, None)
    );

    let record = session.store().get_record(id).unwrap();
    assert_eq!(record.field("Front"), Some(typed));
    assert_eq!(session.viewer().rerendered, vec![id]);
}
