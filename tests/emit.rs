// SPDX-License-Identifier: Apache-2.0

use rstest::rstest;
use vbuilder::*;

fn counter_registry() -> Registry {
    let mut registry = Registry::new();
    registry.add_mod_def(
        ModDef::from_verilog(
            "module counter (input clk, output [7:0] count);\nendmodule\n",
            "rtl/counter.v",
        )
        .unwrap(),
    );
    registry.instantiate("counter", None).unwrap();
    registry
}

#[test]
fn test_counter_top() {
    let mut registry = counter_registry();
    registry
        .connect("u_counter", "clk", ConnectionKind::Input, "sysclk")
        .unwrap();
    registry
        .connect("u_counter", "count", ConnectionKind::Output, "cnt_out")
        .unwrap();

    let text = registry.emit_top("top");
    assert_eq!(
        text,
        "\
// Auto-generated top module: top
module top (
  input wire sysclk,
  output wire [7:0] cnt_out
);

  // Source: rtl/counter.v
  counter u_counter (
    .clk(sysclk),
    .count(cnt_out)
  );

endmodule"
    );

    let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");
    assert!(normalized.contains("counter u_counter ( .clk(sysclk), .count(cnt_out) );"));
}

fn producer_consumer() -> Registry {
    let mut registry = Registry::new();
    let cfg = ParserConfig {
        trim_parameter_lists: true,
        ..Default::default()
    };
    registry.add_mod_def(
        ModDef::from_verilog_with_config(
            "\
module producer #(parameter DEPTH = 4, parameter MODE = \"slow\") (
  input clk,
  output [7:0] data,
  output valid
);
endmodule
",
            "rtl/producer.v",
            &cfg,
        )
        .unwrap(),
    );
    registry.add_mod_def(
        ModDef::from_verilog(
            "\
module consumer (
  input clk,
  input [3:0] data,
  input valid,
  output ready
);
endmodule
",
            "rtl/consumer.v",
        )
        .unwrap(),
    );
    registry.instantiate("producer", None).unwrap();
    registry.instantiate("consumer", Some("u_cons")).unwrap();
    registry
}

#[test]
fn test_producer_consumer() {
    let mut registry = producer_consumer();

    registry
        .connect("u_producer", "clk", ConnectionKind::Input, "clk")
        .unwrap();
    registry
        .connect("u_producer", "data", ConnectionKind::Wire, "bus")
        .unwrap();
    registry
        .connect("u_producer", "valid", ConnectionKind::Wire, "bus_valid")
        .unwrap();
    registry
        .connect("u_cons", "data", ConnectionKind::Wire, "bus")
        .unwrap();
    registry
        .connect("u_cons", "valid", ConnectionKind::Wire, "bus_valid")
        .unwrap();
    registry
        .connect("u_cons", "ready", ConnectionKind::Output, "ready")
        .unwrap();

    registry
        .set_parameter_value("u_producer", "DEPTH", "8")
        .unwrap();
    registry
        .set_parameter_value("u_producer", "MODE", "\"fast\"")
        .unwrap();

    assert_eq!(
        registry.emit_top("top"),
        "\
// Auto-generated top module: top
module top (
  input wire clk,
  output wire ready
);

  wire [3:0] bus;
  wire bus_valid;

  // Source: rtl/producer.v
  producer #(
    .DEPTH(8),
    .MODE(\"fast\")
  ) u_producer (
    .clk(clk),
    .data(bus),
    .valid(bus_valid)
  );

  // Source: rtl/consumer.v
  consumer u_cons (
    .clk(),
    .data(bus),
    .valid(bus_valid),
    .ready(ready)
  );

endmodule"
    );
}

#[test]
fn test_default_parameters() {
    let registry = producer_consumer();
    let text = registry.emit_top("top");
    assert!(text.contains("    .DEPTH(4),\n    .MODE(\"slow\")\n  ) u_producer ("));
}

#[test]
fn test_empty_registry() {
    assert_eq!(
        Registry::new().emit_top("empty"),
        "\
// Auto-generated top module: empty
module empty (
);

endmodule"
    );
}

#[test]
fn test_mismatched_kind_is_not_exported() {
    let mut registry = counter_registry();
    registry
        .connect("u_counter", "clk", ConnectionKind::Output, "sysclk")
        .unwrap();

    let text = registry.emit_top("top");
    assert!(!text.contains("output wire sysclk"));
    assert!(!text.contains("input wire sysclk"));
    assert!(text.contains("    .clk(sysclk)"));
}

#[test]
fn test_duplicate_top_ports_are_kept() {
    let mut registry = counter_registry();
    registry.instantiate("counter", Some("u_counter2")).unwrap();
    registry
        .connect("u_counter", "clk", ConnectionKind::Input, "clk")
        .unwrap();
    registry
        .connect("u_counter2", "clk", ConnectionKind::Input, "clk")
        .unwrap();

    let text = registry.emit_top("top");
    assert_eq!(text.matches("  input wire clk").count(), 2);
    assert!(
        registry
            .lint()
            .contains(&LintIssue::DuplicateDeclaration {
                signal: "clk".to_string(),
                count: 2
            })
    );
}

#[rstest]
#[case("1", "  output wire q")]
#[case("8", "  output wire [7:0] q")]
#[case("7:0", "  output wire [7:0] q")]
#[case("WIDTH-1:0", "  output wire [WIDTH-1:0] q")]
fn test_top_port_width(#[case] width: &str, #[case] expected: &str) {
    let mut mod_def = ModDef::new("flop", "flop.v");
    mod_def
        .add_port(Port::new("q", Direction::Output).with_width(width))
        .unwrap();

    let mut registry = Registry::new();
    registry.add_mod_def(mod_def);
    registry.instantiate("flop", None).unwrap();
    registry
        .connect("u_flop", "q", ConnectionKind::Output, "q")
        .unwrap();

    let text = registry.emit_top("top");
    assert_eq!(text.lines().nth(2), Some(expected));
}

#[test]
fn test_stale_connection_is_ignored() {
    let mut registry = counter_registry();
    registry
        .connect("u_counter", "count", ConnectionKind::Output, "cnt_out")
        .unwrap();

    // Drop the `count` port by replacing the definition.
    registry.add_mod_def(
        ModDef::from_verilog("module counter (input clk);\nendmodule\n", "rtl/counter.v").unwrap(),
    );

    let text = registry.emit_top("top");
    assert!(!text.contains("cnt_out"));
    assert!(text.contains("    .clk()"));
}

#[test]
fn test_emit_top_free_function() {
    let registry = counter_registry();
    let mod_defs = registry
        .mod_defs()
        .map(|mod_def| (mod_def.get_name().to_string(), mod_def.clone()))
        .collect();
    let text = emit_top("top", registry.instances(), &mod_defs);
    assert_eq!(text, registry.emit_top("top"));
}
