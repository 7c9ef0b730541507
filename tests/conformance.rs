use judo::{Error, ErrorKind, Span, Stream, Token};

fn collect(src: &[u8]) -> Vec<Result<Token, Error>> {
    Stream::<512>::new(src).tokens().collect()
}

#[test]
fn scenario_flat_object_round_trip() {
    let tokens = collect(br#"{"a":1,"b":[true,null]}"#);
    let expected = [
        Token::ObjectBegin(Span::new(0, 1)),
        Token::ObjectName(Span::new(1, 3)),
        Token::Number(Span::new(5, 1)),
        Token::ObjectName(Span::new(7, 3)),
        Token::ArrayBegin(Span::new(11, 1)),
        Token::True(Span::new(12, 4)),
        Token::Null(Span::new(17, 4)),
        Token::ArrayEnd(Span::new(21, 1)),
        Token::ObjectEnd(Span::new(22, 1)),
        Token::Eof(Span::new(23, 0)),
    ];
    assert_eq!(tokens.len(), expected.len());
    for (got, want) in tokens.iter().zip(expected.iter()) {
        assert_eq!(got.as_ref().unwrap(), want);
    }
}

#[test]
#[cfg(not(feature = "trailing-commas"))]
#[cfg(not(feature = "json5"))]
fn scenario_trailing_comma_errors_without_extension() {
    let mut stream = Stream::<512>::new(b"[1,2,]");
    let err = loop {
        match stream.scan() {
            Ok(t) if t.is_eof() => panic!("expected error before EOF"),
            Ok(_) => continue,
            Err(e) => break e,
        }
    };
    assert_eq!(err.span.offset, 5);
    assert_eq!(err.message, "expected value");
}

#[test]
#[cfg(any(feature = "trailing-commas", feature = "json5"))]
fn scenario_trailing_comma_accepted_with_extension() {
    let tokens = collect(b"[1,2,]");
    assert!(tokens.iter().all(|t| t.is_ok()));
    let kinds: Vec<&Token> = tokens.iter().map(|t| t.as_ref().unwrap()).collect();
    assert!(matches!(kinds[0], Token::ArrayBegin(_)));
    assert!(matches!(kinds.last().unwrap(), Token::Eof(_)));
}

#[test]
#[cfg(feature = "json5")]
fn scenario_json5_identifier_key_and_comment() {
    let tokens = collect(b"{a:1,/*x*/}");
    for t in &tokens {
        assert!(t.is_ok(), "{:?}", t);
    }
    let kinds: Vec<&Token> = tokens.iter().map(|t| t.as_ref().unwrap()).collect();
    assert_eq!(kinds[0], &Token::ObjectBegin(Span::new(0, 1)));
    assert_eq!(kinds[1], &Token::ObjectName(Span::new(1, 1)));
    assert_eq!(kinds[2], &Token::Number(Span::new(3, 1)));
    assert_eq!(kinds[3], &Token::ObjectEnd(Span::new(10, 1)));
    assert_eq!(kinds[4], &Token::Eof(Span::new(11, 0)));
}

#[test]
fn scenario_lone_high_surrogate_errors() {
    let mut stream = Stream::<512>::new(br#""\uD834""#);
    let err = stream.scan().unwrap_err();
    assert_eq!(err.kind, ErrorKind::BadSyntax);
    assert_eq!(err.span, Span::new(1, 6));
    assert_eq!(err.message, "unmatched surrogate pair");
}

#[test]
fn scenario_leading_zero_octal_errors() {
    let mut stream = Stream::<512>::new(b"0123");
    let err = stream.scan().unwrap_err();
    assert_eq!(err.span, Span::new(0, 4));
    assert_eq!(err.message, "illegal octal number");
}

#[test]
fn maxdepth_boundary_exact_depth_succeeds() {
    let src = "[".repeat(4) + &"]".repeat(4);
    let tokens: Vec<_> = Stream::<5>::new(src.as_bytes()).tokens().collect();
    assert!(tokens.iter().all(|t| t.is_ok()));
}

#[test]
fn maxdepth_boundary_exceeded_errors() {
    let src = "[".repeat(5) + &"]".repeat(5);
    let mut stream = Stream::<5>::new(src.as_bytes());
    loop {
        match stream.scan() {
            Ok(t) if t.is_eof() => panic!("expected maximum nesting error"),
            Ok(_) => continue,
            Err(err) => {
                assert_eq!(err.kind, ErrorKind::MaximumNesting);
                break;
            }
        }
    }
}

#[test]
fn rfc8259_rejects_bare_nul_byte_bom_and_empty_input() {
    assert!(Stream::<512>::new(b"").scan().is_err());
    let mut bom = Stream::<512>::new(&[0xEF, 0xBB, 0xBF, b' ']);
    assert!(bom.scan().is_err());
}

#[test]
fn nul_is_content_byte_in_length_prefixed_mode_but_still_an_unescaped_control_char() {
    let src = b"\"a\0b\"";
    let mut stream = Stream::<512>::new(src);
    let err = stream.scan().unwrap_err();
    assert_eq!(err.message, "unescaped control character");
    assert_eq!(err.span, Span::new(2, 1));
}

#[test]
fn nul_terminates_the_buffer_in_terminated_mode() {
    let src = b"\"a\0b\"";
    let mut stream = judo::Stream::<512>::new_terminated(src);
    let err = stream.scan().unwrap_err();
    assert_eq!(err.message, "unclosed string");
}

#[test]
fn supplementary_plane_string_decodes_correctly() {
    let s = judo::stringify_to_string(br#""𝄞""#).unwrap();
    assert_eq!(s, "\u{1D11E}");
}

#[test]
fn stringify_size_query_matches_written_length() {
    let lexeme: &[u8] = br#""hello\tworld""#;
    let len = judo::stringify_len(lexeme).unwrap();
    let mut buf = vec![0u8; len];
    let written = judo::stringify(lexeme, &mut buf).unwrap();
    assert_eq!(len, written);
    assert_eq!(std::str::from_utf8(&buf).unwrap(), "hello\tworld");
}

#[test]
fn numberify_agrees_with_serde_json_oracle() {
    for text in ["0", "-0", "123", "-42.5", "6.02e23", "1e-10"] {
        let ours = judo::numberify(text.as_bytes()).unwrap();
        let oracle: f64 = serde_json::from_str(text).unwrap();
        assert_eq!(ours, oracle);
    }
}

#[cfg(feature = "parser")]
#[test]
fn tree_parse_matches_scanner_tokens() {
    use judo::Value;

    let value = judo::parse(br#"{"a":1,"b":[true,null]}"#).unwrap();
    let members = value.as_object().unwrap();
    assert_eq!(members.len(), 2);
    assert!(matches!(members[0].value, Value::Number(_)));
    let array = members[1].value.as_array().unwrap();
    assert!(matches!(array[0], Value::Bool(true, _)));
    assert!(matches!(array[1], Value::Null(_)));
    assert_eq!(value.span(), Span::new(0, 24));
}
