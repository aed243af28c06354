mod numeric_tests {
    use crate::numeric::{
        analyze_f16_bits, analyze_f32, analyze_f64, exact_decimal, format_big_integer,
        format_integer, hex_power, pattern_decimal, special_form, FloatInfo, FloatStyle,
        IntStyle, NumberLocale, F16_SPEC, F32_SPEC, F64_SPEC,
    };
    use num_bigint::{BigInt, BigUint};

    #[test]
    fn test_int_style_parse() {
        assert_eq!(IntStyle::parse(""), IntStyle::Decimal { width: 0 });
        assert_eq!(IntStyle::parse("D"), IntStyle::Decimal { width: 0 });
        assert_eq!(IntStyle::parse("D4"), IntStyle::Decimal { width: 4 });
        assert_eq!(IntStyle::parse("d6"), IntStyle::Decimal { width: 6 });
        assert_eq!(IntStyle::parse("B"), IntStyle::Binary { width: 0 });
        assert_eq!(IntStyle::parse("b8"), IntStyle::Binary { width: 8 });
        assert_eq!(IntStyle::parse("Q"), IntStyle::Quaternary { width: 0 });
        assert_eq!(IntStyle::parse("O"), IntStyle::Octal { width: 0 });
        assert_eq!(
            IntStyle::parse("X4"),
            IntStyle::Hex {
                upper: true,
                width: 4
            }
        );
        assert_eq!(
            IntStyle::parse("x"),
            IntStyle::Hex {
                upper: false,
                width: 0
            }
        );
    }

    #[test]
    fn test_integer_radix_rendering() {
        assert_eq!(format_integer(false, 42, &IntStyle::Decimal { width: 0 }), "42");
        assert_eq!(
            format_integer(false, 42, &IntStyle::Binary { width: 0 }),
            "0b101010"
        );
        assert_eq!(
            format_integer(false, 42, &IntStyle::Quaternary { width: 0 }),
            "0q222"
        );
        assert_eq!(
            format_integer(false, 42, &IntStyle::Octal { width: 0 }),
            "0o52"
        );
        assert_eq!(
            format_integer(
                false,
                255,
                &IntStyle::Hex {
                    upper: true,
                    width: 0
                }
            ),
            "0xFF"
        );
        assert_eq!(
            format_integer(
                false,
                255,
                &IntStyle::Hex {
                    upper: false,
                    width: 0
                }
            ),
            "0xff"
        );
    }

    #[test]
    fn test_integer_sign_and_padding() {
        // Negative values render as sign plus magnitude, never two's complement.
        assert_eq!(
            format_integer(
                true,
                255,
                &IntStyle::Hex {
                    upper: true,
                    width: 0
                }
            ),
            "-0xFF"
        );
        // Padding applies to the digits only, after the prefix.
        assert_eq!(
            format_integer(
                false,
                42,
                &IntStyle::Hex {
                    upper: true,
                    width: 4
                }
            ),
            "0x002A"
        );
        assert_eq!(
            format_integer(false, 5, &IntStyle::Binary { width: 8 }),
            "0b00000101"
        );
        assert_eq!(format_integer(false, 0, &IntStyle::Quaternary { width: 0 }), "0q0");
        // Decimal takes a pad width like every other radix.
        assert_eq!(
            format_integer(false, 42, &IntStyle::Decimal { width: 4 }),
            "0042"
        );
        assert_eq!(
            format_integer(true, 42, &IntStyle::Decimal { width: 4 }),
            "-0042"
        );
    }

    #[test]
    fn test_big_integer_rendering() {
        let big: BigInt = "123456789012345678901234567890".parse().unwrap();
        assert_eq!(
            format_big_integer(&big, &IntStyle::Decimal { width: 0 }),
            "123456789012345678901234567890"
        );
        assert_eq!(
            format_big_integer(&BigInt::from(7), &IntStyle::Decimal { width: 3 }),
            "007"
        );
        let neg = BigInt::from(-255);
        assert_eq!(
            format_big_integer(
                &neg,
                &IntStyle::Hex {
                    upper: true,
                    width: 0
                }
            ),
            "-0xFF"
        );
    }

    #[test]
    fn test_exact_decimal_f64() {
        assert_eq!(exact_decimal(&analyze_f64(1.0)), "1.0E+000");
        assert_eq!(exact_decimal(&analyze_f64(-1.0)), "-1.0E+000");
        assert_eq!(exact_decimal(&analyze_f64(0.0)), "0.0E+000");
        assert_eq!(exact_decimal(&analyze_f64(-0.0)), "-0.0E+000");
        assert_eq!(exact_decimal(&analyze_f64(2.5)), "2.5E+000");
        // The closest double to 3.14159, digit for digit.
        assert_eq!(
            exact_decimal(&analyze_f64(3.14159)),
            "3.14158999999999988261834005243144929409027099609375E+000"
        );
    }

    #[test]
    fn test_exact_decimal_f32() {
        assert_eq!(
            exact_decimal(&analyze_f32(0.1f32)),
            "1.00000001490116119384765625E-001"
        );
        assert_eq!(
            exact_decimal(&analyze_f32(3.14159f32)),
            "3.141590118408203125E+000"
        );
    }

    #[test]
    fn test_hex_power() {
        assert_eq!(hex_power(&analyze_f32(3.14159f32)), "0x1.921FA0p+001");
        assert_eq!(hex_power(&analyze_f64(1.0)), "0x1.0000000000000p+000");
        assert_eq!(hex_power(&analyze_f32(-2.0)), "-0x1.000000p+001");
        // binary16 pi: raw exponent 16, mantissa 0x248.
        assert_eq!(hex_power(&analyze_f16_bits(0x4248)), "0x1.920p+001");
    }

    #[test]
    fn test_hex_power_subnormal() {
        // Smallest positive f32 subnormal keeps the leading 0 and the
        // minimum exponent.
        assert_eq!(hex_power(&analyze_f32(f32::from_bits(1))), "0x0.000002p-126");
    }

    /// Parse the exact-decimal rendering back into digits times a power of
    /// ten and check it equals `significand * 2^real_exponent` in unbounded
    /// precision, clearing negative powers by cross-multiplying.
    fn assert_exact_round_trip(info: FloatInfo) {
        let rendered = exact_decimal(&info);
        let body = rendered.trim_start_matches('-');
        let (mantissa, exp) = body.split_once('E').unwrap();
        let exp: i32 = exp.parse().unwrap();
        let (int_part, frac_part) = mantissa.split_once('.').unwrap();
        let digits: BigUint = format!("{}{}", int_part, frac_part).parse().unwrap();
        let pow10 = exp - frac_part.len() as i32;

        let mut lhs = digits;
        let mut rhs = BigUint::from(info.significand);
        if pow10 >= 0 {
            lhs *= BigUint::from(10u32).pow(pow10 as u32);
        } else {
            rhs *= BigUint::from(10u32).pow((-pow10) as u32);
        }
        if info.real_exponent >= 0 {
            rhs <<= info.real_exponent as u32;
        } else {
            lhs <<= (-info.real_exponent) as u32;
        }
        assert_eq!(lhs, rhs, "decode of {} does not round-trip", rendered);
    }

    #[test]
    fn test_exact_decimal_round_trips_bit_patterns() {
        // Normals, subnormals, and extremes of all three widths.
        let f32_bits: [u32; 8] = [
            0x3F80_0000, // 1.0
            0x3DCC_CCCD, // 0.1
            0x4049_0FD0, // 3.14159
            0x0000_0001, // smallest subnormal
            0x007F_FFFF, // largest subnormal
            0x0080_0000, // smallest normal
            0x7F7F_FFFF, // f32::MAX
            0xC159_999A, // -13.6
        ];
        for bits in f32_bits {
            assert_exact_round_trip(FloatInfo::from_bits(bits as u64, F32_SPEC));
        }

        let f64_values = [1.0f64, 0.1, 3.14159, -2.5, f64::MIN_POSITIVE, f64::MAX];
        for value in f64_values {
            assert_exact_round_trip(FloatInfo::from_bits(value.to_bits(), F64_SPEC));
        }
        // Subnormal doubles, hundreds of digits.
        for bits in [1u64, 0x000F_FFFF_FFFF_FFFF] {
            assert_exact_round_trip(FloatInfo::from_bits(bits, F64_SPEC));
        }

        for bits in [0x4248u16, 0x0001, 0x03FF, 0x7BFF] {
            assert_exact_round_trip(FloatInfo::from_bits(bits as u64, F16_SPEC));
        }
    }

    #[test]
    fn test_special_forms() {
        assert_eq!(
            special_form(&analyze_f32(f32::INFINITY)),
            Some("Infinity".to_string())
        );
        assert_eq!(
            special_form(&analyze_f32(f32::NEG_INFINITY)),
            Some("-Infinity".to_string())
        );
        assert_eq!(
            special_form(&analyze_f32(f32::from_bits(0x7FC0_0000))),
            Some("QuietNaN(0x400000)".to_string())
        );
        assert_eq!(
            special_form(&analyze_f32(f32::from_bits(0x7F80_0001))),
            Some("SignalingNaN(0x1)".to_string())
        );
        assert_eq!(special_form(&analyze_f64(1.0)), None);
    }

    #[test]
    fn test_float_style_parse() {
        assert_eq!(FloatStyle::parse(""), FloatStyle::Shortest);
        assert_eq!(FloatStyle::parse("G"), FloatStyle::Shortest);
        assert_eq!(FloatStyle::parse("EX"), FloatStyle::Exact);
        assert_eq!(FloatStyle::parse("HP"), FloatStyle::HexPower);
        assert_eq!(FloatStyle::parse("F2"), FloatStyle::Fixed(2));
        assert_eq!(FloatStyle::parse("E5"), FloatStyle::Scientific(5));
        assert_eq!(FloatStyle::parse("N2"), FloatStyle::Grouped(2));
    }

    #[test]
    fn test_pattern_decimal() {
        let locale = NumberLocale::default();
        assert_eq!(
            pattern_decimal(3.14159, &FloatStyle::Fixed(2), &locale),
            "3.14"
        );
        assert_eq!(
            pattern_decimal(3.14159, &FloatStyle::Scientific(5), &locale),
            "3.14159E+000"
        );
        assert_eq!(
            pattern_decimal(0.0001, &FloatStyle::Scientific(2), &locale),
            "1.00E-004"
        );
        assert_eq!(
            pattern_decimal(1234567.891, &FloatStyle::Grouped(2), &locale),
            "1,234,567.89"
        );
    }

    #[test]
    fn test_pattern_decimal_locale() {
        let european = NumberLocale {
            decimal: ',',
            group: '.',
        };
        assert_eq!(
            pattern_decimal(1234567.891, &FloatStyle::Grouped(2), &european),
            "1.234.567,89"
        );
        assert_eq!(
            pattern_decimal(3.14159, &FloatStyle::Fixed(2), &european),
            "3,14"
        );
    }
}

mod value_tests {
    use crate::value::types::{IntValue, Member, TypeKind, Value};
    use crate::value_from_json;
    use serde_json::json;

    #[test]
    fn test_value_kinds_and_names() {
        assert_eq!(Value::from(42i32).type_name(), "i32");
        assert_eq!(Value::from(1.5f64).type_name(), "f64");
        assert_eq!(Value::from("hi").type_name(), "string");
        assert_eq!(Value::list(vec![]).type_name(), "List");
        assert_eq!(Value::named_list("Queue", vec![]).type_name(), "Queue");
        assert_eq!(Value::map(vec![]).type_name(), "Dictionary");
        assert_eq!(Value::nullable(Some("i32"), None).type_name(), "i32?");
    }

    #[test]
    fn test_kind_labels() {
        assert_eq!(Value::from(42i32).kind_label(), "struct");
        assert_eq!(Value::list(vec![]).kind_label(), "class");
        assert_eq!(
            Value::object("Point", TypeKind::Struct, vec![]).kind_label(),
            "struct"
        );
        assert_eq!(
            Value::object("Person", TypeKind::Class, vec![]).kind_label(),
            "class"
        );
        assert_eq!(
            Value::object("Point", TypeKind::Record, vec![]).kind_label(),
            "record"
        );
    }

    #[test]
    fn test_identity_shared_through_clones() {
        let list = Value::list(vec![1i32.into()]);
        let alias = list.clone();
        assert_eq!(list.identity(), alias.identity());
        assert!(list.identity().is_some());
        assert!(Value::from(42i32).identity().is_none());
        let other = Value::list(vec![1i32.into()]);
        assert_ne!(list.identity(), other.identity());
    }

    #[test]
    fn test_int_parts() {
        assert_eq!(IntValue::I8(-5).parts(), Some((true, 5)));
        assert_eq!(IntValue::I64(i64::MIN).parts(), Some((true, 1u128 << 63)));
        assert_eq!(IntValue::U8(255).parts(), Some((false, 255)));
        assert_eq!(IntValue::Big(1.into()).parts(), None);
    }

    #[test]
    fn test_value_from_json() {
        let doc = json!({
            "name": "widget",
            "count": 3,
            "weight": 1.5,
            "tags": ["a", "b"],
            "missing": null
        });
        let value = value_from_json(&doc);
        let Value::Object(object) = &value else {
            panic!("expected an object");
        };
        assert_eq!(object.type_name, "Object");
        let members: Vec<String> = object.snapshot().iter().map(|m| m.name.clone()).collect();
        assert_eq!(members, ["name", "count", "weight", "tags", "missing"]);
    }

    #[test]
    fn test_object_member_push() {
        let object = Value::object("Point", TypeKind::Struct, vec![]);
        let Value::Object(inner) = &object else {
            unreachable!()
        };
        inner.push_member(Member::field("X", "i32", 10i32.into()));
        assert_eq!(inner.snapshot().len(), 1);
    }
}

mod member_tests {
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    use crate::render::context::ReprContext;
    use crate::render::members::{invoke_accessor, resolve_members, MemberOutcome};
    use crate::render::registry::FormatterRegistry;
    use crate::value::types::{AccessError, Accessor, Member, ObjectValue, TypeKind, Value};
    use crate::{MemberView, ReprConfig};

    fn create_context(config: ReprConfig) -> ReprContext {
        ReprContext::new(Arc::new(config), Arc::new(FormatterRegistry::with_defaults()))
    }

    fn create_object() -> ObjectValue {
        ObjectValue::new(
            "Sample",
            TypeKind::Class,
            vec![
                Member::field("A", "i32", 1i32.into()),
                Member::private_field("b", "i32", 2i32.into()),
                Member::computed("C", "i32", || Ok(3i32.into())),
                Member::private_computed("d", "i32", || Ok(4i32.into())),
            ],
        )
    }

    #[test]
    fn test_view_mode_selection() {
        let object = create_object();

        let ctx = create_context(ReprConfig::default());
        let (members, _) = resolve_members(&object, &ctx, false);
        let names: Vec<String> = members.iter().map(|m| m.display_name()).collect();
        assert_eq!(names, ["A"]);

        let ctx = create_context(
            ReprConfig::builder()
                .view_mode(MemberView::AllFields)
                .build(),
        );
        let (members, _) = resolve_members(&object, &ctx, false);
        let names: Vec<String> = members.iter().map(|m| m.display_name()).collect();
        assert_eq!(names, ["A", "private_b"]);
    }

    #[test]
    fn test_partition_order() {
        // Public fields, public computed, private fields, private computed,
        // regardless of declared interleaving.
        let object = ObjectValue::new(
            "Sample",
            TypeKind::Class,
            vec![
                Member::private_computed("pc", "i32", || Ok(4i32.into())),
                Member::private_field("pf", "i32", 2i32.into()),
                Member::computed("c", "i32", || Ok(3i32.into())),
                Member::field("f", "i32", 1i32.into()),
            ],
        );
        let ctx = create_context(
            ReprConfig::builder()
                .view_mode(MemberView::Everything)
                .max_member_time_ms(1000)
                .build(),
        );
        let (members, _) = resolve_members(&object, &ctx, false);
        let names: Vec<String> = members.iter().map(|m| m.name.clone()).collect();
        assert_eq!(names, ["f", "c", "pf", "pc"]);
    }

    #[test]
    fn test_computed_skipped_without_budget() {
        let object = create_object();
        let ctx = create_context(
            ReprConfig::builder()
                .view_mode(MemberView::Everything)
                .build(),
        );
        // Text mode: no budget means computed members never run.
        let (members, _) = resolve_members(&object, &ctx, false);
        let names: Vec<String> = members.iter().map(|m| m.name.clone()).collect();
        assert_eq!(names, ["A", "b"]);
        // Tree mode opts into unbounded evaluation.
        let (members, _) = resolve_members(&object, &ctx, true);
        let names: Vec<String> = members.iter().map(|m| m.name.clone()).collect();
        assert_eq!(names, ["A", "C", "b", "d"]);
    }

    #[test]
    fn test_member_cap_applies_before_evaluation() {
        let ran = Arc::new(std::sync::atomic::AtomicBool::new(false));
        let flag = Arc::clone(&ran);
        let object = ObjectValue::new(
            "Sample",
            TypeKind::Class,
            vec![
                Member::field("A", "i32", 1i32.into()),
                Member::computed("B", "i32", move || {
                    flag.store(true, std::sync::atomic::Ordering::SeqCst);
                    Ok(2i32.into())
                }),
            ],
        );
        let ctx = create_context(
            ReprConfig::builder()
                .view_mode(MemberView::Everything)
                .max_member_time_ms(1000)
                .max_items(1)
                .build(),
        );
        let (members, truncated) = resolve_members(&object, &ctx, false);
        assert_eq!(members.len(), 1);
        assert!(truncated);
        assert!(!ran.load(std::sync::atomic::Ordering::SeqCst));
    }

    #[test]
    fn test_accessor_timeout() {
        let accessor: Accessor = Arc::new(|| {
            thread::sleep(Duration::from_millis(500));
            Ok(1i32.into())
        });
        match invoke_accessor("slow", &accessor, 20) {
            MemberOutcome::TimedOut => {}
            other => panic!("expected timeout, got {:?}", other),
        }
    }

    #[test]
    fn test_accessor_error_and_panic() {
        let failing: Accessor =
            Arc::new(|| Err(AccessError::new("InvalidOperation", "boom")));
        match invoke_accessor("failing", &failing, 100) {
            MemberOutcome::Error(e) => assert_eq!(e.to_string(), "[InvalidOperation: boom]"),
            other => panic!("expected error, got {:?}", other),
        }

        let panicking: Accessor = Arc::new(|| panic!("cannot touch this"));
        match invoke_accessor("panicking", &panicking, 100) {
            MemberOutcome::Error(e) => {
                assert_eq!(e.kind, "Panic");
                assert!(e.message.contains("cannot touch this"));
            }
            other => panic!("expected panic error, got {:?}", other),
        }
    }

    #[test]
    fn test_accessor_result_within_budget() {
        let accessor: Accessor = Arc::new(|| Ok(Value::from(7i32)));
        match invoke_accessor("quick", &accessor, 1000) {
            MemberOutcome::Value(v) => assert_eq!(v.type_name(), "i32"),
            other => panic!("expected value, got {:?}", other),
        }
    }
}

mod config_tests {
    use crate::{ConfigFile, FloatStyle, IntStyle, ReprConfig};

    #[test]
    fn test_builder_chains() {
        let config = ReprConfig::builder()
            .max_depth(3)
            .max_items(10)
            .max_string_length(20)
            .int_format("X4")
            .float_format("EX")
            .build();
        assert_eq!(config.max_depth, 3);
        assert_eq!(config.max_items, 10);
        assert_eq!(config.max_string_length, 20);
        assert_eq!(
            config.int_style,
            IntStyle::Hex {
                upper: true,
                width: 4
            }
        );
        assert_eq!(config.float_style, FloatStyle::Exact);
    }

    #[test]
    fn test_defaults_are_unlimited() {
        let config = ReprConfig::default();
        assert_eq!(config.max_depth, -1);
        assert_eq!(config.max_items, -1);
        assert_eq!(config.max_string_length, -1);
        assert_eq!(config.max_member_time_ms, 0);
    }

    #[test]
    fn test_config_file_overlay() {
        let file: ConfigFile = serde_json::from_str(
            r#"{"max_depth": 2, "int_format": "x", "float_format": "F2"}"#,
        )
        .unwrap();
        let config = file.apply(ReprConfig::default());
        assert_eq!(config.max_depth, 2);
        assert_eq!(
            config.int_style,
            IntStyle::Hex {
                upper: false,
                width: 0
            }
        );
        assert_eq!(config.float_style, FloatStyle::Fixed(2));
        // Untouched fields keep their defaults.
        assert_eq!(config.max_items, -1);
    }
}
