use std::fs;
use std::path::{Path, PathBuf};

use sentiscan::io::Alias;
use sentiscan::pipelines::{LexiconPipeline, Pipeline, PipelineConfig};

fn write_resources(dir: &Path) -> (PathBuf, PathBuf) {
    let affect = dir.join("lexico_afinn.csv");
    let emotion = dir.join("lexico_nrc.csv");
    fs::write(
        &affect,
        "palabra,puntuacion\nbueno,2\nexcelente,3\nmalo,-3\nhorrible,-3\nfeo,-1\nregular,0\n",
    )
    .unwrap();
    fs::write(
        &emotion,
        "palabra,sentimiento\nfeliz,joy\nfeliz,surprise\ntriste,sadness\nhorrible,fear\nhorrible,disgust\n",
    )
    .unwrap();
    (affect, emotion)
}

fn write_corpus(dir: &Path) -> PathBuf {
    let src = dir.join("videos.csv");
    fs::write(
        &src,
        "\u{feff}id,Comentario,Título_Video,Descripción,Tags,Vistas\n\
         1,Bueno bueno! muy feliz,Video excelente,,\"música, feliz\",100\n\
         2,\"horrible, triste y feo\",Qué malo,Descripción regular,,20\n\
         3,,,,,0\n\
         4,excelente_video 😀 bueno,Feliz feliz,HORRIBLE,bueno,7\n",
    )
    .unwrap();
    src
}

fn pipeline(dir: &Path, dst: Option<PathBuf>) -> LexiconPipeline {
    let (affect, emotion) = write_resources(dir);
    LexiconPipeline::new(
        write_corpus(dir),
        PipelineConfig {
            affect,
            emotion,
            dst,
            ..Default::default()
        },
    )
}

#[test]
fn idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let p = pipeline(dir.path(), None);

    let first = p.run().unwrap();
    let output = fs::read(&first.output).unwrap();
    let positive = fs::read(dir.path().join("positive_words.csv")).unwrap();
    let negative = fs::read(dir.path().join("negative_words.csv")).unwrap();

    let second = p.run().unwrap();
    assert_eq!(first.output, second.output);
    assert_eq!(fs::read(&second.output).unwrap(), output);
    assert_eq!(fs::read(dir.path().join("positive_words.csv")).unwrap(), positive);
    assert_eq!(fs::read(dir.path().join("negative_words.csv")).unwrap(), negative);
}

#[test]
fn annotated_table() {
    let dir = tempfile::tempdir().unwrap();
    let report = pipeline(dir.path(), None).run().unwrap();
    assert_eq!(report.output, dir.path().join("videos_sentiment.csv"));

    let content = fs::read_to_string(&report.output).unwrap();
    let content = content.strip_prefix('\u{feff}').unwrap();
    let mut reader = csv::Reader::from_reader(content.as_bytes());
    assert_eq!(
        reader.headers().unwrap(),
        vec![
            "id",
            "Comentario",
            "Título_Video",
            "Descripción",
            "Tags",
            "Vistas",
            "Comentario_affect",
            "Comentario_emotions",
            "Título_Video_affect",
            "Título_Video_emotions",
            "Descripción_affect",
            "Descripción_emotions",
            "Tags_affect",
            "Tags_emotions",
        ]
    );

    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 4);

    // passthrough columns are kept as is
    assert_eq!(&rows[0][4], "música, feliz");
    assert_eq!(&rows[1][1], "horrible, triste y feo");

    assert_eq!(&rows[0][6], "4");
    assert_eq!(&rows[0][7], "joy:1, surprise:1");
    assert_eq!(&rows[0][8], "3");

    assert_eq!(&rows[1][6], "-4");
    assert_eq!(&rows[1][7], "fear:1, disgust:1, sadness:1");
    assert_eq!(&rows[1][8], "-3");
    assert_eq!(&rows[1][10], "0");

    assert_eq!(
        rows[2].iter().skip(6).collect::<Vec<_>>(),
        vec!["0", "", "0", "", "0", "", "0", ""]
    );

    // "excelente_video" is a single token
    assert_eq!(&rows[3][6], "2");
    assert_eq!(&rows[3][9], "joy:2, surprise:2");
    assert_eq!(&rows[3][10], "-3");
    assert_eq!(&rows[3][12], "2");

    assert_eq!(report.summary.rows, 4);
    assert_eq!(report.summary.skipped, 4 + 2);
    assert_eq!(report.summary.scored, 16 - 6);
}

#[test]
fn frequency_tables() {
    let dir = tempfile::tempdir().unwrap();
    let dst = dir.path().join("reports");
    let report = pipeline(dir.path(), Some(dst.clone())).run().unwrap();

    assert_eq!(report.output, dst.join("videos_sentiment.csv"));
    assert_eq!(
        fs::read_to_string(dst.join("positive_words.csv")).unwrap(),
        "\u{feff}word,frequency\nbueno,4\nexcelente,1\n"
    );
    assert_eq!(
        fs::read_to_string(dst.join("negative_words.csv")).unwrap(),
        "\u{feff}word,frequency\nhorrible,2\nfeo,1\nmalo,1\n"
    );
}

#[test]
fn explicit_columns() {
    let dir = tempfile::tempdir().unwrap();
    let (affect, emotion) = write_resources(dir.path());
    let p = LexiconPipeline::new(
        write_corpus(dir.path()),
        PipelineConfig {
            affect,
            emotion,
            columns: vec![Alias::exact("tags")],
            dst: None,
        },
    );

    let report = p.run().unwrap();
    let content = fs::read_to_string(&report.output).unwrap();
    assert_eq!(
        content.lines().next().unwrap(),
        "\u{feff}id,Comentario,Título_Video,Descripción,Tags,Vistas,Tags_affect,Tags_emotions"
    );
}
