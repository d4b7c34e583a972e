mod spotify_client_test;
