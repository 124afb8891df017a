use super::Harness;

fn echo(line: &str) -> String {
    let mut sh = Harness::system();
    sh.run(line);
    sh.out.contents()
}

#[test]
fn test_quoting_rules() {
    // Single quotes preserve everything literally
    assert_eq!(echo("echo '  $HOME  \"  \\n  \\t  '"), "  $HOME  \"  \\n  \\t  \n");

    // Double quotes only escape \" and \\
    assert_eq!(echo(r#"echo "a \"quoted\" \\ \n""#), "a \"quoted\" \\ \\n\n");

    // Mixed quotes
    assert_eq!(echo(r#"echo '"$X"' "'literal'""#), "\"$X\" 'literal'\n");
}

#[test]
fn test_escape_sequences() {
    assert_eq!(echo(r"echo a\ b\>c"), "a b>c\n");
    assert_eq!(echo(r"echo '\n\t\\'"), "\\n\\t\\\\\n");
    assert_eq!(echo(r#"echo \'\"x\"\'"#), "'\"x\"'\n");
}

#[test]
fn test_spacing_inside_quotes_survives() {
    assert_eq!(echo("echo 'hello     world'"), "hello     world\n");
    assert_eq!(echo("echo hello     world"), "hello world\n");
    assert_eq!(echo("echo \"a  b\"  'c  d'"), "a  b c  d\n");
}
