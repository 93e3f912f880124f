//! Per-language request snippet generators.
//!
//! Each generator is a pure function from a resolved request to display
//! source showing how to issue the same request outside the browser. The
//! output is never executed by this system, but it must stay syntactically
//! valid, so user-supplied values are escaped for the target syntax.

use cove_domain::{CodeLanguage, ResolvedRequest};

/// Generates the snippet for `request` in `language`.
#[must_use]
pub fn generate_code(request: &ResolvedRequest, language: CodeLanguage) -> String {
    match language {
        CodeLanguage::Curl => generate_curl(request),
        CodeLanguage::JavaScript => generate_javascript(request),
        CodeLanguage::Python => generate_python(request),
        CodeLanguage::Go => generate_go(request),
        CodeLanguage::Rust => generate_rust(request),
    }
}

/// Escapes a value for a single-quoted shell string: each `'` closes the
/// string, emits an escaped quote and reopens it.
fn shell_quote(value: &str) -> String {
    value.replace('\'', "'\\''")
}

/// Escapes a value for a double-quoted string literal (JavaScript, Go,
/// Rust).
fn literal_quote(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

/// Escapes a value for a single-quoted Python string literal.
fn python_quote(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('\'', "\\'")
        .replace('\n', "\\n")
}

fn generate_curl(request: &ResolvedRequest) -> String {
    let mut code = format!(
        "curl -X {} \\\n  '{}'",
        request.method,
        shell_quote(&request.url)
    );
    for header in request.headers.iter() {
        code.push_str(&format!(
            " \\\n  -H '{}: {}'",
            shell_quote(&header.name),
            shell_quote(&header.value)
        ));
    }
    if let Some(body) = &request.body {
        code.push_str(&format!(" \\\n  -d '{}'", shell_quote(body)));
    }
    code
}

fn generate_javascript(request: &ResolvedRequest) -> String {
    let mut code = format!(
        "const response = await fetch(\"{}\", {{\n  method: \"{}\",\n  headers: {{\n",
        literal_quote(&request.url),
        request.method
    );
    for header in request.headers.iter() {
        code.push_str(&format!(
            "    \"{}\": \"{}\",\n",
            literal_quote(&header.name),
            literal_quote(&header.value)
        ));
    }
    code.push_str("  },\n");
    if let Some(body) = &request.body {
        code.push_str(&format!("  body: JSON.stringify({body}),\n"));
    }
    code.push_str("});\n\nconst data = await response.json();\nconsole.log(data);");
    code
}

fn generate_python(request: &ResolvedRequest) -> String {
    let mut code = String::from("import requests\n\n");
    code.push_str(&format!(
        "response = requests.{}(\n    '{}',\n",
        request.method.as_str().to_ascii_lowercase(),
        python_quote(&request.url)
    ));
    code.push_str("    headers={\n");
    for header in request.headers.iter() {
        code.push_str(&format!(
            "        '{}': '{}',\n",
            python_quote(&header.name),
            python_quote(&header.value)
        ));
    }
    code.push_str("    },\n");
    if let Some(body) = &request.body {
        code.push_str(&format!("    json={body},\n"));
    }
    code.push_str(")\n\ndata = response.json()\nprint(data)");
    code
}

fn generate_go(request: &ResolvedRequest) -> String {
    let method = request.method.as_str();
    let url = literal_quote(&request.url);

    let mut code = String::from("package main\n\nimport (\n    \"fmt\"\n    \"io\"\n    \"net/http\"\n");
    if request.has_body() {
        code.push_str("    \"strings\"\n");
    }
    code.push_str(")\n\nfunc main() {\n");

    if let Some(body) = &request.body {
        code.push_str(&format!("    body := strings.NewReader(`{body}`)\n"));
        code.push_str(&format!(
            "    req, _ := http.NewRequest(\"{method}\", \"{url}\", body)\n"
        ));
    } else {
        code.push_str(&format!(
            "    req, _ := http.NewRequest(\"{method}\", \"{url}\", nil)\n"
        ));
    }

    for header in request.headers.iter() {
        code.push_str(&format!(
            "    req.Header.Set(\"{}\", \"{}\")\n",
            literal_quote(&header.name),
            literal_quote(&header.value)
        ));
    }

    code.push_str(
        "\n    client := &http.Client{}\n    resp, _ := client.Do(req)\n    defer resp.Body.Close()\n\n    respBody, _ := io.ReadAll(resp.Body)\n    fmt.Println(string(respBody))\n}",
    );
    code
}

fn generate_rust(request: &ResolvedRequest) -> String {
    let mut code = String::from(
        "#[tokio::main]\nasync fn main() -> Result<(), Box<dyn std::error::Error>> {\n    let client = reqwest::Client::new();\n\n",
    );
    code.push_str(&format!(
        "    let response = client\n        .{}(\"{}\")\n",
        request.method.as_str().to_ascii_lowercase(),
        literal_quote(&request.url)
    ));
    for header in request.headers.iter() {
        code.push_str(&format!(
            "        .header(\"{}\", \"{}\")\n",
            literal_quote(&header.name),
            literal_quote(&header.value)
        ));
    }
    if let Some(body) = &request.body {
        code.push_str(&format!("        .body(\"{}\")\n", literal_quote(body)));
    }
    code.push_str("        .send()\n        .await?;\n\n");
    code.push_str("    let body = response.text().await?;\n    println!(\"{}\", body);\n\n    Ok(())\n}");
    code
}
