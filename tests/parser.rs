// SPDX-License-Identifier: Apache-2.0

use std::io::Write;
use std::path::Path;

use itertools::Itertools;
use rstest::rstest;
use tempfile::NamedTempFile;
use vbuilder::*;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn str2tmpfile(contents: impl AsRef<[u8]>) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_ref()).unwrap();
    file.flush().unwrap();
    file
}

const COUNTER: &str = "\
`define W 8
// Free-running counter
module counter #(
  parameter WIDTH = 8,
  parameter NAME = \"cnt\"
) (
  input clk,
  input wire rst_n,
  output reg [`W-1:0] count  /* registered */
);
  parameter type T = logic;
endmodule
";

fn trim_lists() -> ParserConfig<'static> {
    ParserConfig {
        trim_parameter_lists: true,
        ..Default::default()
    }
}

#[test]
fn test_counter_header() {
    init_logger();
    let counter = ModDef::from_verilog_with_config(COUNTER, "rtl/counter.v", &trim_lists()).unwrap();

    assert_eq!(counter.get_name(), "counter");
    assert_eq!(counter.get_filepath(), "rtl/counter.v");

    assert_eq!(
        counter.get_ports(),
        &[
            Port::new("clk", Direction::Input),
            Port::new("rst_n", Direction::Input),
            Port::new("count", Direction::Output)
                .with_dtype("reg")
                .with_width("8-1:0"),
        ]
    );

    let parameters = counter.get_parameters();
    assert_eq!(parameters.len(), 3);
    assert_eq!(parameters[0], Parameter::new("WIDTH", "8"));
    assert_eq!(parameters[0].ptype, Some(ParameterType::Int));
    assert_eq!(parameters[1].value, "\"cnt\"");
    assert_eq!(parameters[1].ptype, Some(ParameterType::String));
    assert_eq!(parameters[2].name, "T");
    assert_eq!(parameters[2].value, "logic");
    assert_eq!(parameters[2].ptype, None);

    assert_eq!(counter.get_macros().len(), 1);
    assert_eq!(counter.get_macros()["W"], "8");
}

#[test]
fn test_parameter_value_runs_to_separator() {
    // Without list trimming, the last header parameter keeps the text up to
    // the next comma.
    let counter = ModDef::from_verilog(COUNTER, "rtl/counter.v").unwrap();
    assert_eq!(counter.get_parameter("WIDTH").unwrap().value, "8");
    assert_eq!(
        counter.get_parameter("NAME").unwrap().value,
        "\"cnt\"\n) (\n  input clk"
    );
    assert_eq!(counter.get_parameter("T").unwrap().value, "logic");
}

#[rstest]
#[case(false)]
#[case(true)]
fn test_parenthesis_in_string_parameter(#[case] trim_parameter_lists: bool) {
    let cfg = ParserConfig {
        trim_parameter_lists,
        ..Default::default()
    };
    let mod_def = ModDef::from_verilog_with_config(
        "module m (input clk);\n  parameter S = \"a)b\";\n  parameter E = (W) + 1;\nendmodule\n",
        "m.v",
        &cfg,
    )
    .unwrap();
    let s = mod_def.get_parameter("S").unwrap();
    assert_eq!(s.value, "\"a)b\"");
    assert_eq!(s.ptype, Some(ParameterType::String));
    assert_eq!(mod_def.get_parameter("E").unwrap().value, "(W) + 1");
}

#[test]
fn test_unbalanced_body_parameter_kept_by_default() {
    let mod_def =
        ModDef::from_verilog("module m (input clk);\n  parameter E = W) + 1;\n", "m.v").unwrap();
    assert_eq!(mod_def.get_parameter("E").unwrap().value, "W) + 1");
}

#[test]
fn test_reparse_is_deterministic() {
    let first = ModDef::from_verilog(COUNTER, "rtl/counter.v").unwrap();
    let second = ModDef::from_verilog(COUNTER, "rtl/counter.v").unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_macro_in_width() {
    let mod_def = ModDef::from_verilog("`define W 8\nmodule m (input [`W:0] d);", "m.v").unwrap();
    assert_eq!(mod_def.get_port("d").unwrap().width, "8:0");
    assert_eq!(mod_def.get_macros()["W"], "8");
}

#[rstest]
#[case("input a", Direction::Input, "wire", "1")]
#[case("output logic [3:0] a", Direction::Output, "logic", "3:0")]
#[case("inout wire [ 7 : 0 ] a", Direction::InOut, "wire", "7 : 0")]
#[case("INPUT REG a", Direction::Input, "reg", "1")]
#[case("output [WIDTH-1:0] a", Direction::Output, "wire", "WIDTH-1:0")]
fn test_port_declaration(
    #[case] declaration: &str,
    #[case] direction: Direction,
    #[case] dtype: &str,
    #[case] width: &str,
) {
    let mod_def = ModDef::from_verilog(format!("module m ({declaration});"), "m.v").unwrap();
    assert_eq!(
        mod_def.get_ports(),
        &[Port::new("a", direction).with_dtype(dtype).with_width(width)]
    );
}

fn synthesize(num_ports: usize, num_parameters: usize) -> String {
    let ports = (0..num_ports)
        .map(|i| {
            if i % 2 == 0 {
                format!("  input [{i}:0] in{i}")
            } else {
                format!("  output out{i}")
            }
        })
        .join(",\n");
    if num_parameters == 0 {
        format!("module gen (\n{ports}\n);\nendmodule\n")
    } else {
        let parameters = (0..num_parameters)
            .map(|i| format!("  parameter P{i} = {i}"))
            .join(",\n");
        format!("module gen #(\n{parameters}\n) (\n{ports}\n);\nendmodule\n")
    }
}

#[rstest]
#[case(1, 0)]
#[case(2, 1)]
#[case(5, 3)]
#[case(8, 8)]
fn test_port_and_parameter_counts(#[case] num_ports: usize, #[case] num_parameters: usize) {
    let mod_def = ModDef::from_verilog_with_config(
        synthesize(num_ports, num_parameters),
        "gen.v",
        &trim_lists(),
    )
    .unwrap();

    let port_names = mod_def.get_ports().iter().map(|p| p.name.clone()).collect::<Vec<_>>();
    let expected_ports = (0..num_ports)
        .map(|i| if i % 2 == 0 { format!("in{i}") } else { format!("out{i}") })
        .collect::<Vec<_>>();
    assert_eq!(port_names, expected_ports);

    let parameters = mod_def.get_parameters();
    assert_eq!(parameters.len(), num_parameters);
    for (i, parameter) in parameters.iter().enumerate() {
        assert_eq!(parameter.name, format!("P{i}"));
        assert_eq!(parameter.value, i.to_string());
    }
}

#[test]
fn test_comments_are_ignored() {
    let mod_def = ModDef::from_verilog(
        "module m (input a, // input b\n /* output c, */ output d);",
        "m.v",
    )
    .unwrap();
    let names = mod_def.get_ports().iter().map(|p| p.name.as_str()).collect::<Vec<_>>();
    assert_eq!(names, ["a", "d"]);
}

#[test]
fn test_only_first_module() {
    let mod_def = ModDef::from_verilog(
        "module first (input a);\nendmodule\nmodule second (output b);\nendmodule\n",
        "two.v",
    )
    .unwrap();
    assert_eq!(mod_def.get_name(), "first");
    assert_eq!(mod_def.get_ports().len(), 1);
}

#[test]
fn test_duplicate_port_keeps_first() {
    let mod_def = ModDef::from_verilog("module m (input a, output [3:0] a);", "m.v").unwrap();
    assert_eq!(mod_def.get_ports(), &[Port::new("a", Direction::Input)]);
}

#[test]
fn test_non_ansi_fallback() {
    let source = "module legacy (a, b);\n  input a;\n  output b;\nendmodule\n";

    let mod_def = ModDef::from_verilog(source, "legacy.v").unwrap();
    assert_eq!(mod_def.get_ports(), &[Port::new("b", Direction::Wire)]);

    let cfg = ParserConfig {
        ansi_fallback: false,
        ..Default::default()
    };
    let mod_def = ModDef::from_verilog_with_config(source, "legacy.v", &cfg).unwrap();
    assert!(mod_def.get_ports().is_empty());
}

#[test]
fn test_predefined_macros() {
    let cfg = ParserConfig {
        defines: &[("BUS", "16")],
        ..Default::default()
    };
    let mod_def =
        ModDef::from_verilog_with_config("module m (input [`BUS-1:0] d);", "m.v", &cfg).unwrap();
    assert_eq!(mod_def.get_port("d").unwrap().width, "16-1:0");
    assert_eq!(mod_def.get_macros()["BUS"], "16");
}

#[test]
fn test_no_module_found() {
    let result = ModDef::from_verilog("wire a;\nassign a = 1'b0;\n", "notamodule.v");
    assert!(matches!(result, Err(Error::NoModuleFound(path)) if path == "notamodule.v"));
}

#[test]
fn test_from_file() {
    init_logger();
    let file = str2tmpfile(COUNTER);
    let counter = ModDef::from_verilog_file(file.path(), &ParserConfig::default()).unwrap();
    assert_eq!(counter.get_name(), "counter");
    assert_eq!(counter.get_filepath(), file.path().to_string_lossy());
    assert_eq!(counter.get_ports().len(), 3);
}

#[test]
fn test_invalid_utf8_is_replaced() {
    let file = str2tmpfile(b"// caf\xe9 \xff\nmodule m (input a);\nendmodule\n");
    let mod_def = ModDef::from_verilog_file(file.path(), &ParserConfig::default()).unwrap();
    assert_eq!(mod_def.get_name(), "m");
}

#[test]
fn test_missing_file_is_io_error() {
    let result = ModDef::from_verilog_file(
        Path::new("/nonexistent/dir/missing.v"),
        &ParserConfig::default(),
    );
    assert!(matches!(result, Err(Error::Io { .. })));
}

#[test]
fn test_file_without_module() {
    let file = str2tmpfile("`define ONLY_MACROS 1\n");
    let result = ModDef::from_verilog_file(file.path(), &ParserConfig::default());
    assert!(matches!(result, Err(Error::NoModuleFound(_))));
}

#[test]
fn test_display() {
    let mod_def = ModDef::from_verilog("module counter (input clk);", "/work/rtl/counter.v").unwrap();
    assert_eq!(mod_def.to_string(), "counter (counter.v)");
}
